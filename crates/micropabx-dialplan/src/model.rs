// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Routing rule model.
//!
//! These are read-only snapshots of the rule store. The compiler never
//! mutates them and never reaches back into the store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A directly dialable endpoint (handset registration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Peer {
    /// Extension number of the peer.
    pub number: String,
}

/// A call queue. Its number doubles as the extension pattern that routes
/// into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    /// Store identifier, referenced by routes and time conditions.
    pub id: i64,
    /// Queue number.
    pub number: String,
}

/// A time-of-day and weekday window attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCondition {
    /// Window start, `HH:MM` (inclusive).
    pub start_time: String,
    /// Window end, `HH:MM` (inclusive).
    pub end_time: String,
    /// Weekday tokens in source form, e.g. `"mon,tue,wed"`.
    #[serde(default)]
    pub days: String,
    /// Queue to dispatch to while inside the window.
    #[serde(default)]
    pub matched_queue_id: Option<i64>,
}

impl TimeCondition {
    /// Non-blank day tokens, trimmed, in source order.
    pub fn day_tokens(&self) -> impl Iterator<Item = &str> {
        self.days
            .split(',')
            .map(str::trim)
            .filter(|day| !day.is_empty())
    }
}

/// An inbound-call rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Store identifier.
    pub id: i64,
    /// Display label.
    pub name: String,
    /// Dialed number pattern that triggers this route.
    pub entry_number: String,
    /// Queue used when no time window matches.
    #[serde(default)]
    pub fallback_queue_id: Option<i64>,
    /// Time windows, in store order.
    #[serde(default)]
    pub time_conditions: Vec<TimeCondition>,
}

/// Everything the compiler needs, in read order: routes by name, queues
/// and peers by number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingSnapshot {
    /// Registered peers.
    #[serde(default)]
    pub peers: Vec<Peer>,
    /// Call queues.
    #[serde(default)]
    pub queues: Vec<Queue>,
    /// Inbound routes with their time conditions attached.
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RoutingSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors loading a snapshot file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SnapshotError {
    /// The file could not be read.
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid snapshot document.
    #[error("failed to parse snapshot {}: {source}", path.display())]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
