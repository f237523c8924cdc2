// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Builders for extension line groups and recording-instrumented blocks.

use super::statement::{Action, Dialplan, Line, Priority, Statement};
use crate::recording::RecordingPolicy;

/// Channel variable holding the unique id without its fractional part.
pub const UNIQUEID_SAFE_VAR: &str = "UNIQUEID_SAFE";
/// Channel variable holding the recording file stem.
pub const RECORDING_FILE_VAR: &str = "ARQUIVO";

/// Whether an instrumented block answers the channel before its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// Never answer.
    Never,
    /// Answer only when recording is on.
    WhenRecording,
    /// Always answer.
    Always,
}

/// Wraps a call-handling body in optional MixMonitor start/stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    recording: RecordingPolicy,
    answer: AnswerMode,
}

impl Instrumentation {
    /// Create an instrumentation wrapper.
    pub fn new(recording: RecordingPolicy, answer: AnswerMode) -> Self {
        Self { recording, answer }
    }

    /// Statements emitted before the body.
    ///
    /// The recording file is `<caller>-<exten>-<uniqueid>`, with the
    /// fractional part of the unique id cut off.
    pub fn start_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.recording.is_enabled() {
            actions.push(Action::Set {
                var: UNIQUEID_SAFE_VAR.to_string(),
                value: "${CUT(UNIQUEID,.,1)}".to_string(),
            });
            actions.push(Action::Set {
                var: RECORDING_FILE_VAR.to_string(),
                value: format!("${{CALLERID(num)}}-${{EXTEN}}-${{{}}}", UNIQUEID_SAFE_VAR),
            });
            actions.push(Action::MixMonitor {
                file: format!("${{{}}}.wav", RECORDING_FILE_VAR),
                options: "b".to_string(),
            });
        }
        let answer = match self.answer {
            AnswerMode::Never => false,
            AnswerMode::WhenRecording => self.recording.is_enabled(),
            AnswerMode::Always => true,
        };
        if answer {
            actions.push(Action::Answer);
        }
        actions
    }

    /// Statements emitted after the body.
    pub fn stop_actions(&self) -> Vec<Action> {
        if self.recording.is_enabled() {
            vec![Action::StopMixMonitor]
        } else {
            Vec::new()
        }
    }
}

/// Appends the lines of one extension pattern, numbering priorities
/// `1`, then `n`.
pub struct ExtenBlock<'p> {
    out: &'p mut Dialplan,
    pattern: String,
    opened: bool,
}

impl<'p> ExtenBlock<'p> {
    /// Start a new line group for `pattern`.
    pub fn open(out: &'p mut Dialplan, pattern: impl Into<String>) -> Self {
        Self {
            out,
            pattern: pattern.into(),
            opened: false,
        }
    }

    fn next_priority(&mut self) -> Priority {
        if self.opened {
            Priority::Next
        } else {
            self.opened = true;
            Priority::First
        }
    }

    fn push(&mut self, label: Option<String>, action: Option<Action>, comment: Option<&str>) {
        let priority = self.next_priority();
        self.out.push(Line::Exten(Statement {
            pattern: self.pattern.clone(),
            priority,
            label,
            action,
            comment: comment.map(str::to_string),
        }));
    }

    /// Append one application step.
    pub fn step(&mut self, action: Action) -> &mut Self {
        self.push(None, Some(action), None);
        self
    }

    /// Append one application step with a trailing comment.
    pub fn step_with_comment(&mut self, action: Action, comment: &str) -> &mut Self {
        self.push(None, Some(action), Some(comment));
        self
    }

    /// Append a label-only line that jumps can target.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.push(Some(label.into()), None, None);
        self
    }

    /// Emit `body` between the instrumentation start and stop statements.
    pub fn instrumented(
        &mut self,
        instrumentation: Instrumentation,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        for action in instrumentation.start_actions() {
            self.step(action);
        }
        body(self);
        for action in instrumentation.stop_actions() {
            self.step(action);
        }
        self
    }
}
