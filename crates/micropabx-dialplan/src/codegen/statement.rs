// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed dialplan statements.
//!
//! Every line of the artifact is built as a value here and rendered through
//! `Display`, so the line grammar lives in one place:
//!
//! ```text
//! exten => <pattern>,<priority>[(<label>)][,<Action>(<args>)][ ; <comment>]
//! ```
//!
//! Line breaks inside any rendered value are folded into spaces, so rule
//! data such as route names can never start a line of its own.

use std::fmt::{self, Write};

/// Statement priority: `1` opens a pattern, `n` continues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// First line of a pattern.
    First,
    /// Every following line.
    Next,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("1"),
            Self::Next => f.write_str("n"),
        }
    }
}

/// Dialplan application invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `NoOp(text)`.
    NoOp(String),
    /// `GotoIfTime(start-end,day,*,*?label)`.
    GotoIfTime {
        /// Window start as written in the rule.
        start: String,
        /// Window end as written in the rule.
        end: String,
        /// Weekday token.
        day: String,
        /// Jump target.
        label: String,
    },
    /// `Set(var=value)`.
    Set {
        /// Channel variable.
        var: String,
        /// Value expression.
        value: String,
    },
    /// `MixMonitor(file,options)`.
    MixMonitor {
        /// Recording file expression.
        file: String,
        /// MixMonitor option flags.
        options: String,
    },
    /// `StopMixMonitor()`.
    StopMixMonitor,
    /// `Answer()`.
    Answer,
    /// `Queue(name)`.
    Queue(String),
    /// `Dial(target,timeout,options)`.
    Dial {
        /// Dial string.
        target: String,
        /// Ring timeout in seconds.
        timeout_secs: u32,
        /// Dial option flags.
        options: String,
    },
    /// `Hangup()`.
    Hangup,
}

impl Action {
    /// True for statements that hand the call to a queue or peer.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Queue(_) | Self::Dial { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp(text) => write!(f, "NoOp({})", text),
            Self::GotoIfTime {
                start,
                end,
                day,
                label,
            } => write!(f, "GotoIfTime({}-{},{},*,*?{})", start, end, day, label),
            Self::Set { var, value } => write!(f, "Set({}={})", var, value),
            Self::MixMonitor { file, options } => write!(f, "MixMonitor({},{})", file, options),
            Self::StopMixMonitor => f.write_str("StopMixMonitor()"),
            Self::Answer => f.write_str("Answer()"),
            Self::Queue(name) => write!(f, "Queue({})", name),
            Self::Dial {
                target,
                timeout_secs,
                options,
            } => write!(f, "Dial({},{},{})", target, timeout_secs, options),
            Self::Hangup => f.write_str("Hangup()"),
        }
    }
}

/// One `exten =>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Extension pattern the line belongs to.
    pub pattern: String,
    /// Priority marker.
    pub priority: Priority,
    /// Jump label attached to this priority.
    pub label: Option<String>,
    /// Application to run. Absent on label-only lines.
    pub action: Option<Action>,
    /// Trailing `; comment`.
    pub comment: Option<String>,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = SingleLine(f);
        write!(out, "exten => {},{}", self.pattern, self.priority)?;
        if let Some(label) = &self.label {
            write!(out, "({})", label)?;
        }
        if let Some(action) = &self.action {
            write!(out, ",{}", action)?;
        }
        if let Some(comment) = &self.comment {
            write!(out, " ; {}", comment)?;
        }
        Ok(())
    }
}

/// Writer that replaces `\r` and `\n` with a space.
struct SingleLine<'a, W: Write>(&'a mut W);

impl<W: Write> Write for SingleLine<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut parts = s.split(['\r', '\n']);
        if let Some(first) = parts.next() {
            self.0.write_str(first)?;
        }
        for part in parts {
            self.0.write_char(' ')?;
            self.0.write_str(part)?;
        }
        Ok(())
    }
}

/// A line of the generated configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Empty line.
    Blank,
    /// `; text`
    Comment(String),
    /// `[name] ; comment`
    Context {
        /// Context name.
        name: String,
        /// Trailing comment.
        comment: String,
    },
    /// `#include "file"`
    Include(String),
    /// An extension statement.
    Exten(Statement),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = SingleLine(f);
        match self {
            Self::Blank => Ok(()),
            Self::Comment(text) => write!(out, "; {}", text),
            Self::Context { name, comment } => write!(out, "[{}] ; {}", name, comment),
            Self::Include(file) => write!(out, "#include \"{}\"", file),
            Self::Exten(statement) => write!(out, "{}", statement),
        }
    }
}

/// Ordered output of one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialplan {
    lines: Vec<Line>,
}

impl Dialplan {
    /// Empty dialplan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// All lines in emission order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Only the `exten =>` statements, in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.lines.iter().filter_map(|line| match line {
            Line::Exten(statement) => Some(statement),
            _ => None,
        })
    }

    /// Render the artifact text: lines joined with `\n`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dialplan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            line.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(priority: Priority, action: Option<Action>) -> Statement {
        Statement {
            pattern: "4000".to_string(),
            priority,
            label: None,
            action,
            comment: None,
        }
    }

    #[test]
    fn test_first_and_next_priorities() {
        let first = statement(Priority::First, Some(Action::NoOp("hi".to_string())));
        assert_eq!(first.to_string(), "exten => 4000,1,NoOp(hi)");

        let next = statement(Priority::Next, Some(Action::Hangup));
        assert_eq!(next.to_string(), "exten => 4000,n,Hangup()");
    }

    #[test]
    fn test_label_only_line() {
        let mut s = statement(Priority::Next, None);
        s.label = Some("time-mon-08-00".to_string());
        assert_eq!(s.to_string(), "exten => 4000,n(time-mon-08-00)");
    }

    #[test]
    fn test_trailing_comment() {
        let mut s = statement(Priority::Next, Some(Action::Queue("600".to_string())));
        s.comment = Some("Rota fora do horario".to_string());
        assert_eq!(
            s.to_string(),
            "exten => 4000,n,Queue(600) ; Rota fora do horario"
        );
    }

    #[test]
    fn test_action_rendering() {
        let goto = Action::GotoIfTime {
            start: "08:00".to_string(),
            end: "18:00".to_string(),
            day: "mon".to_string(),
            label: "time-mon-08-00".to_string(),
        };
        assert_eq!(
            goto.to_string(),
            "GotoIfTime(08:00-18:00,mon,*,*?time-mon-08-00)"
        );

        let dial = Action::Dial {
            target: "SIP/${EXTEN}".to_string(),
            timeout_secs: 20,
            options: "Ttr".to_string(),
        };
        assert_eq!(dial.to_string(), "Dial(SIP/${EXTEN},20,Ttr)");

        let set = Action::Set {
            var: "UNIQUEID_SAFE".to_string(),
            value: "${CUT(UNIQUEID,.,1)}".to_string(),
        };
        assert_eq!(set.to_string(), "Set(UNIQUEID_SAFE=${CUT(UNIQUEID,.,1)})");

        assert_eq!(Action::StopMixMonitor.to_string(), "StopMixMonitor()");
        assert_eq!(Action::Answer.to_string(), "Answer()");
    }

    #[test]
    fn test_is_dispatch() {
        assert!(Action::Queue("600".to_string()).is_dispatch());
        assert!(!Action::Answer.is_dispatch());
        assert!(!Action::Hangup.is_dispatch());
    }

    #[test]
    fn test_dialplan_render_joins_lines() {
        let mut plan = Dialplan::new();
        plan.push(Line::Comment("header".to_string()));
        plan.push(Line::Context {
            name: "interno".to_string(),
            comment: "ctx".to_string(),
        });
        plan.push(Line::Blank);
        plan.push(Line::Include("extensions_custom.conf".to_string()));
        plan.push(Line::Blank);
        assert_eq!(
            plan.render(),
            "; header\n[interno] ; ctx\n\n#include \"extensions_custom.conf\"\n"
        );
    }

    #[test]
    fn test_line_breaks_in_values_stay_on_one_line() {
        let mut s = statement(
            Priority::First,
            Some(Action::NoOp("Main\nexten => _X.,1,Hangup()".to_string())),
        );
        s.comment = Some("a\r\nb".to_string());
        assert_eq!(
            s.to_string(),
            "exten => 4000,1,NoOp(Main exten => _X.,1,Hangup()) ; a  b"
        );

        let mut plan = Dialplan::new();
        plan.push(Line::Comment("Rota: Main\nexten => 1,1,Hangup()".to_string()));
        plan.push(Line::Exten(s));
        assert_eq!(plan.render().lines().count(), 2);
        assert!(plan.render().starts_with("; Rota: Main exten => 1,1,Hangup()\n"));
    }

    #[test]
    fn test_empty_dialplan_renders_empty() {
        assert_eq!(Dialplan::new().render(), "");
    }
}
