// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Inbound route emitter.
//!
//! A route with time conditions lowers to:
//!
//! ```text
//! header
//! GotoIfTime(...)        one per (resolved condition, day)
//! [rec start] Queue(else) [rec stop]
//! Hangup()
//! (label) [rec start, Answer] Queue(matched) [rec stop] Hangup()   one per jump
//! ```
//!
//! Conditions whose matched queue does not resolve contribute nothing.
//! Days sharing one condition get separate labels and separate copies of
//! the same body.

use tracing::debug;

use super::RuleEmitter;
use crate::codegen::block::{AnswerMode, ExtenBlock};
use crate::codegen::context::EmitContext;
use crate::codegen::statement::{Action, Dialplan, Line};
use crate::model::Route;

/// Comment on the dispatch taken when no window matched.
pub const OUTSIDE_HOURS_COMMENT: &str = "Rota fora do horario";
/// Comment on the dispatch taken inside a window.
pub const INSIDE_HOURS_COMMENT: &str = "Rota dentro do horario";

/// One jump target of a route: a resolved condition on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBranch<'a> {
    /// Weekday token.
    pub day: &'a str,
    /// Window start as written.
    pub start_time: &'a str,
    /// Window end as written.
    pub end_time: &'a str,
    /// Jump label.
    pub label: String,
    /// Queue number dispatched to inside the window.
    pub queue: &'a str,
}

/// Expand a route's conditions into branches, in condition then day order.
///
/// Conditions with no matched queue, or whose queue does not exist, are
/// dropped while their siblings are kept.
pub fn window_branches<'a>(route: &'a Route, ctx: &EmitContext<'a>) -> Vec<WindowBranch<'a>> {
    let mut branches = Vec::new();
    for (index, condition) in route.time_conditions.iter().enumerate() {
        let Some(queue_id) = condition.matched_queue_id else {
            debug!(
                route = %route.name,
                condition_index = index,
                "Time condition has no target queue, skipping"
            );
            continue;
        };
        let Some(queue) = ctx.queue_number(queue_id) else {
            debug!(
                route = %route.name,
                condition_index = index,
                queue_id = queue_id,
                "Time condition target queue does not exist, skipping"
            );
            continue;
        };
        for day in condition.day_tokens() {
            branches.push(WindowBranch {
                day,
                start_time: &condition.start_time,
                end_time: &condition.end_time,
                label: EmitContext::branch_label(day, &condition.start_time),
                queue,
            });
        }
    }
    branches
}

impl RuleEmitter for Route {
    fn emit(&self, ctx: &EmitContext<'_>, out: &mut Dialplan) {
        let exten = self.entry_number.as_str();

        out.push(Line::Blank);
        out.push(Line::Comment(format!("Rota: {}", self.name)));

        let else_queue = ctx.fallback_queue(self);
        let mut block = ExtenBlock::open(out, exten);
        block.step(Action::NoOp(format!(
            "### Rota de Entrada: {} para o numero {} ###",
            self.name, exten
        )));

        if self.time_conditions.is_empty() {
            if let Some(queue) = else_queue {
                block.instrumented(ctx.instrumentation(AnswerMode::Never), |b| {
                    b.step(Action::Queue(queue.to_string()));
                });
            }
            block.step(Action::Hangup);
            return;
        }

        let branches = window_branches(self, ctx);

        for branch in &branches {
            block.step(Action::GotoIfTime {
                start: branch.start_time.to_string(),
                end: branch.end_time.to_string(),
                day: branch.day.to_string(),
                label: branch.label.clone(),
            });
        }

        // Fell through every window check.
        if let Some(queue) = else_queue {
            block.instrumented(ctx.instrumentation(AnswerMode::Never), |b| {
                b.step_with_comment(Action::Queue(queue.to_string()), OUTSIDE_HOURS_COMMENT);
            });
        }
        block.step(Action::Hangup);

        for branch in &branches {
            block.label(branch.label.clone());
            block.instrumented(ctx.instrumentation(AnswerMode::WhenRecording), |b| {
                b.step_with_comment(Action::Queue(branch.queue.to_string()), INSIDE_HOURS_COMMENT);
            });
            block.step(Action::Hangup);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Queue, TimeCondition};
    use crate::recording::RecordingPolicy;

    fn queues() -> Vec<Queue> {
        vec![
            Queue {
                id: 1,
                number: "600".to_string(),
            },
            Queue {
                id: 2,
                number: "601".to_string(),
            },
        ]
    }

    fn route(fallback: Option<i64>, conditions: Vec<TimeCondition>) -> Route {
        Route {
            id: 10,
            name: "Comercial".to_string(),
            entry_number: "4000".to_string(),
            fallback_queue_id: fallback,
            time_conditions: conditions,
        }
    }

    fn condition(start: &str, days: &str, queue: Option<i64>) -> TimeCondition {
        TimeCondition {
            start_time: start.to_string(),
            end_time: "18:00".to_string(),
            days: days.to_string(),
            matched_queue_id: queue,
        }
    }

    fn emit(route: &Route, recording: RecordingPolicy) -> Vec<String> {
        let queues = queues();
        let ctx = EmitContext::new(recording, &queues);
        let mut plan = Dialplan::new();
        route.emit(&ctx, &mut plan);
        plan.lines().iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_route_without_conditions_dispatches_to_fallback() {
        let lines = emit(&route(Some(1), vec![]), RecordingPolicy::Disabled);
        assert_eq!(
            lines,
            vec![
                "",
                "; Rota: Comercial",
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,Queue(600)",
                "exten => 4000,n,Hangup()",
            ]
        );
    }

    #[test]
    fn test_route_without_conditions_records_fallback_dispatch() {
        let lines = emit(&route(Some(1), vec![]), RecordingPolicy::Enabled);
        assert_eq!(
            lines[2..],
            [
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,Set(UNIQUEID_SAFE=${CUT(UNIQUEID,.,1)})",
                "exten => 4000,n,Set(ARQUIVO=${CALLERID(num)}-${EXTEN}-${UNIQUEID_SAFE})",
                "exten => 4000,n,MixMonitor(${ARQUIVO}.wav,b)",
                "exten => 4000,n,Queue(600)",
                "exten => 4000,n,StopMixMonitor()",
                "exten => 4000,n,Hangup()",
            ]
        );
        assert!(!lines.iter().any(|line| line.contains("Answer()")));
    }

    #[test]
    fn test_route_name_with_line_break_cannot_add_statements() {
        let mut r = route(Some(1), vec![]);
        r.name = "Main\nexten => _X.,1,System(touch /tmp/x)".to_string();
        let lines = emit(&r, RecordingPolicy::Disabled);

        assert!(lines.iter().all(|line| !line.contains('\n')));
        assert!(!lines.iter().any(|line| line.starts_with("exten => _X.")));
        assert_eq!(lines[1], "; Rota: Main exten => _X.,1,System(touch /tmp/x)");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_unresolved_fallback_degrades_to_hangup() {
        let lines = emit(&route(Some(99), vec![]), RecordingPolicy::Enabled);
        assert_eq!(
            lines[2..],
            [
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,Hangup()",
            ]
        );
    }

    #[test]
    fn test_single_condition_two_days() {
        let r = route(Some(1), vec![condition("08:00", "mon,tue", Some(2))]);
        let lines = emit(&r, RecordingPolicy::Disabled);
        assert_eq!(
            lines[2..],
            [
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,GotoIfTime(08:00-18:00,mon,*,*?time-mon-08-00)",
                "exten => 4000,n,GotoIfTime(08:00-18:00,tue,*,*?time-tue-08-00)",
                "exten => 4000,n,Queue(600) ; Rota fora do horario",
                "exten => 4000,n,Hangup()",
                "exten => 4000,n(time-mon-08-00)",
                "exten => 4000,n,Queue(601) ; Rota dentro do horario",
                "exten => 4000,n,Hangup()",
                "exten => 4000,n(time-tue-08-00)",
                "exten => 4000,n,Queue(601) ; Rota dentro do horario",
                "exten => 4000,n,Hangup()",
            ]
        );
    }

    #[test]
    fn test_window_branch_with_recording_answers() {
        let r = route(None, vec![condition("08:30", "fri", Some(1))]);
        let lines = emit(&r, RecordingPolicy::Enabled);
        assert_eq!(
            lines[2..],
            [
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,GotoIfTime(08:30-18:00,fri,*,*?time-fri-08-30)",
                "exten => 4000,n,Hangup()",
                "exten => 4000,n(time-fri-08-30)",
                "exten => 4000,n,Set(UNIQUEID_SAFE=${CUT(UNIQUEID,.,1)})",
                "exten => 4000,n,Set(ARQUIVO=${CALLERID(num)}-${EXTEN}-${UNIQUEID_SAFE})",
                "exten => 4000,n,MixMonitor(${ARQUIVO}.wav,b)",
                "exten => 4000,n,Answer()",
                "exten => 4000,n,Queue(600) ; Rota dentro do horario",
                "exten => 4000,n,StopMixMonitor()",
                "exten => 4000,n,Hangup()",
            ]
        );
    }

    #[test]
    fn test_unresolved_condition_dropped_sibling_kept() {
        let r = route(
            None,
            vec![
                condition("07:00", "mon", Some(42)),
                condition("08:00", "tue", Some(1)),
                condition("09:00", "wed", None),
            ],
        );
        let lines = emit(&r, RecordingPolicy::Disabled);
        assert!(lines.iter().all(|l| !l.contains("07-00") && !l.contains("09-00")));
        assert_eq!(
            lines
                .iter()
                .filter(|l| l.contains("GotoIfTime"))
                .collect::<Vec<_>>(),
            vec!["exten => 4000,n,GotoIfTime(08:00-18:00,tue,*,*?time-tue-08-00)"]
        );
    }

    #[test]
    fn test_multiple_conditions_checks_precede_fallthrough() {
        let r = route(
            Some(1),
            vec![
                condition("08:00", "mon", Some(2)),
                condition("13:00", "sat", Some(1)),
            ],
        );
        let lines = emit(&r, RecordingPolicy::Disabled);
        let first_hangup = lines.iter().position(|l| l.ends_with("Hangup()")).unwrap();
        let last_check = lines.iter().rposition(|l| l.contains("GotoIfTime")).unwrap();
        assert!(last_check < first_hangup);
        assert_eq!(lines.iter().filter(|l| l.contains("fora do horario")).count(), 1);
        assert_eq!(lines.iter().filter(|l| l.contains("dentro do horario")).count(), 2);
    }

    #[test]
    fn test_all_conditions_unresolved_still_falls_through_once() {
        let r = route(Some(1), vec![condition("08:00", "mon", Some(77))]);
        let lines = emit(&r, RecordingPolicy::Disabled);
        assert_eq!(
            lines[2..],
            [
                "exten => 4000,1,NoOp(### Rota de Entrada: Comercial para o numero 4000 ###)",
                "exten => 4000,n,Queue(600) ; Rota fora do horario",
                "exten => 4000,n,Hangup()",
            ]
        );
    }

    #[test]
    fn test_window_branches_skip_blank_days() {
        let queues = queues();
        let ctx = EmitContext::new(RecordingPolicy::Disabled, &queues);
        let r = route(None, vec![condition("08:00", " mon, ,,tue ", Some(1))]);
        let branches = window_branches(&r, &ctx);
        let labels: Vec<&str> = branches.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["time-mon-08-00", "time-tue-08-00"]);
        assert!(branches.iter().all(|b| b.queue == "600"));
    }
}
