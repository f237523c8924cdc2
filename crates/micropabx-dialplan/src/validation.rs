// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Optional validation of a routing snapshot.
//!
//! The compiler silently drops anything it cannot resolve. This pass reports
//! those cases, plus rule data the switch is likely to reject or ignore. It
//! never changes what [`crate::compile`] emits.
//!
//! # Warning Codes
//!
//! | Code | Warning |
//! |------|---------|
//! | W001 | Fallback queue does not exist |
//! | W002 | Matched queue of a time condition does not exist |
//! | W003 | Time of day is not `HH:MM` or `HH:MM:SS` |
//! | W004 | Day token is not a weekday abbreviation |
//! | W005 | Two branches of one route share a label |

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use strum::EnumString;

use crate::codegen::context::EmitContext;
use crate::model::{Route, RoutingSnapshot};
use crate::recording::RecordingPolicy;

/// Weekday tokens accepted by the switch's time matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weekday {
    /// Monday
    Mon,
    /// Tuesday
    Tue,
    /// Wednesday
    Wed,
    /// Thursday
    Thu,
    /// Friday
    Fri,
    /// Saturday
    Sat,
    /// Sunday
    Sun,
}

/// A non-fatal problem found in the routing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The route's fallback queue id matches no queue.
    UnresolvedFallbackQueue {
        /// Route name.
        route: String,
        /// Dangling queue id.
        queue_id: i64,
    },
    /// A time condition's matched queue id matches no queue.
    UnresolvedMatchedQueue {
        /// Route name.
        route: String,
        /// Position of the condition within the route.
        condition_index: usize,
        /// Dangling queue id.
        queue_id: i64,
    },
    /// A start or end time cannot be parsed.
    MalformedTime {
        /// Route name.
        route: String,
        /// Position of the condition within the route.
        condition_index: usize,
        /// Offending value.
        value: String,
    },
    /// A day token is not a weekday abbreviation.
    UnknownDay {
        /// Route name.
        route: String,
        /// Position of the condition within the route.
        condition_index: usize,
        /// Offending token.
        day: String,
    },
    /// Two branches of one route produce the same label, so only the first
    /// one is reachable.
    DuplicateBranchLabel {
        /// Route name.
        route: String,
        /// Shared label.
        label: String,
    },
}

impl ValidationWarning {
    /// Stable warning code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvedFallbackQueue { .. } => "W001",
            Self::UnresolvedMatchedQueue { .. } => "W002",
            Self::MalformedTime { .. } => "W003",
            Self::UnknownDay { .. } => "W004",
            Self::DuplicateBranchLabel { .. } => "W005",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            Self::UnresolvedFallbackQueue { route, queue_id } => write!(
                f,
                "Route '{}' falls back to queue id {} which does not exist; calls outside hours are hung up",
                route, queue_id
            ),
            Self::UnresolvedMatchedQueue {
                route,
                condition_index,
                queue_id,
            } => write!(
                f,
                "Time condition #{} of route '{}' targets queue id {} which does not exist; the condition is ignored",
                condition_index, route, queue_id
            ),
            Self::MalformedTime {
                route,
                condition_index,
                value,
            } => write!(
                f,
                "Time condition #{} of route '{}' has malformed time '{}'",
                condition_index, route, value
            ),
            Self::UnknownDay {
                route,
                condition_index,
                day,
            } => write!(
                f,
                "Time condition #{} of route '{}' has unknown day '{}'",
                condition_index, route, day
            ),
            Self::DuplicateBranchLabel { route, label } => write!(
                f,
                "Route '{}' has more than one branch labelled '{}'; only the first is reachable",
                route, label
            ),
        }
    }
}

/// Result of validating a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Warnings in route order.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True if any warning was found.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validate a snapshot.
pub fn validate(snapshot: &RoutingSnapshot) -> ValidationReport {
    let ctx = EmitContext::new(RecordingPolicy::Disabled, &snapshot.queues);
    let mut report = ValidationReport::default();
    for route in &snapshot.routes {
        validate_route(route, &ctx, &mut report.warnings);
    }
    report
}

fn validate_route(route: &Route, ctx: &EmitContext<'_>, warnings: &mut Vec<ValidationWarning>) {
    if let Some(queue_id) = route.fallback_queue_id
        && ctx.queue_number(queue_id).is_none()
    {
        warnings.push(ValidationWarning::UnresolvedFallbackQueue {
            route: route.name.clone(),
            queue_id,
        });
    }

    let mut labels = HashSet::new();
    for (index, condition) in route.time_conditions.iter().enumerate() {
        for value in [&condition.start_time, &condition.end_time] {
            if !is_time_of_day(value) {
                warnings.push(ValidationWarning::MalformedTime {
                    route: route.name.clone(),
                    condition_index: index,
                    value: value.clone(),
                });
            }
        }

        for day in condition.day_tokens() {
            if Weekday::from_str(day).is_err() {
                warnings.push(ValidationWarning::UnknownDay {
                    route: route.name.clone(),
                    condition_index: index,
                    day: day.to_string(),
                });
            }
        }

        // Only conditions the compiler keeps can produce colliding labels.
        let resolved = match condition.matched_queue_id {
            Some(queue_id) if ctx.queue_number(queue_id).is_none() => {
                warnings.push(ValidationWarning::UnresolvedMatchedQueue {
                    route: route.name.clone(),
                    condition_index: index,
                    queue_id,
                });
                false
            }
            Some(_) => true,
            None => false,
        };
        if !resolved {
            continue;
        }
        for day in condition.day_tokens() {
            let label = EmitContext::branch_label(day, &condition.start_time);
            if !labels.insert(label.clone()) {
                warnings.push(ValidationWarning::DuplicateBranchLabel {
                    route: route.name.clone(),
                    label,
                });
            }
        }
    }
}

fn is_time_of_day(value: &str) -> bool {
    NaiveTime::parse_from_str(value, "%H:%M").is_ok()
        || NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Queue, TimeCondition};

    fn snapshot(route: Route) -> RoutingSnapshot {
        RoutingSnapshot {
            queues: vec![Queue {
                id: 1,
                number: "600".to_string(),
            }],
            routes: vec![route],
            ..Default::default()
        }
    }

    fn route(fallback: Option<i64>, conditions: Vec<TimeCondition>) -> Route {
        Route {
            id: 1,
            name: "Main".to_string(),
            entry_number: "4000".to_string(),
            fallback_queue_id: fallback,
            time_conditions: conditions,
        }
    }

    fn condition(start: &str, end: &str, days: &str, queue: Option<i64>) -> TimeCondition {
        TimeCondition {
            start_time: start.to_string(),
            end_time: end.to_string(),
            days: days.to_string(),
            matched_queue_id: queue,
        }
    }

    #[test]
    fn test_clean_snapshot_has_no_warnings() {
        let report = validate(&snapshot(route(
            Some(1),
            vec![condition("08:00", "18:00", "mon,tue,Wed", Some(1))],
        )));
        assert!(!report.has_warnings(), "{:?}", report.warnings);
    }

    #[test]
    fn test_unresolved_fallback() {
        let report = validate(&snapshot(route(Some(5), vec![])));
        assert_eq!(
            report.warnings,
            vec![ValidationWarning::UnresolvedFallbackQueue {
                route: "Main".to_string(),
                queue_id: 5,
            }]
        );
        assert!(report.warnings[0].to_string().starts_with("[W001]"));
    }

    #[test]
    fn test_unresolved_matched_queue() {
        let report = validate(&snapshot(route(
            None,
            vec![condition("08:00", "18:00", "mon", Some(9))],
        )));
        assert!(matches!(
            report.warnings.as_slice(),
            [ValidationWarning::UnresolvedMatchedQueue {
                condition_index: 0,
                queue_id: 9,
                ..
            }]
        ));
    }

    #[test]
    fn test_malformed_time_and_unknown_day() {
        let report = validate(&snapshot(route(
            None,
            vec![condition("8h", "18:00:00", "mon,funday", Some(1))],
        )));
        let codes: Vec<&str> = report.warnings.iter().map(|w| w.code()).collect();
        assert_eq!(codes, vec!["W003", "W004"]);
    }

    #[test]
    fn test_duplicate_labels() {
        let report = validate(&snapshot(route(
            None,
            vec![
                condition("08:00", "12:00", "mon", Some(1)),
                condition("08:00", "18:00", "mon,tue", Some(1)),
            ],
        )));
        assert_eq!(
            report.warnings,
            vec![ValidationWarning::DuplicateBranchLabel {
                route: "Main".to_string(),
                label: "time-mon-08-00".to_string(),
            }]
        );
    }

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::from_str("mon").unwrap(), Weekday::Mon);
        assert_eq!(Weekday::from_str("SUN").unwrap(), Weekday::Sun);
        assert!(Weekday::from_str("monday").is_err());
    }
}
