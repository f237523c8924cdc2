// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Emission context for dialplan generation.
//!
//! Holds the recording policy and the queue index, and builds label tokens.

use std::collections::BTreeMap;

use tracing::debug;

use super::block::{AnswerMode, Instrumentation};
use crate::model::{Queue, Route};
use crate::recording::RecordingPolicy;

/// Context shared by all rule emitters during one compile.
pub struct EmitContext<'a> {
    /// Whether dispatch blocks get recording instrumentation.
    pub recording: RecordingPolicy,

    /// Queue number by store id
    queues: BTreeMap<i64, &'a str>,
}

impl<'a> EmitContext<'a> {
    /// Create a context over the queues of a snapshot.
    pub fn new(recording: RecordingPolicy, queues: &'a [Queue]) -> Self {
        Self {
            recording,
            queues: queues
                .iter()
                .map(|queue| (queue.id, queue.number.as_str()))
                .collect(),
        }
    }

    /// Resolve a queue reference. A missing id is not an error, the caller
    /// drops whatever depended on it.
    pub fn queue_number(&self, id: i64) -> Option<&'a str> {
        self.queues.get(&id).copied()
    }

    /// Resolve a route's fallback queue, logging an unresolved reference.
    pub fn fallback_queue(&self, route: &Route) -> Option<&'a str> {
        let id = route.fallback_queue_id?;
        let number = self.queue_number(id);
        if number.is_none() {
            debug!(
                route = %route.name,
                queue_id = id,
                "Fallback queue does not exist, route has no else target"
            );
        }
        number
    }

    /// Instrumentation wrapper for this compile's recording policy.
    pub fn instrumentation(&self, answer: AnswerMode) -> Instrumentation {
        Instrumentation::new(self.recording, answer)
    }

    /// Turn a time of day into a label token (`08:30` becomes `08-30`).
    pub fn sanitize_label(s: &str) -> String {
        s.replace(':', "-")
    }

    /// Branch label for a window: unique per (day, start time) in a route.
    pub fn branch_label(day: &str, start_time: &str) -> String {
        format!("time-{}-{}", day, Self::sanitize_label(start_time))
    }
}
