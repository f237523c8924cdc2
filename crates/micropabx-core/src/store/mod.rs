// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rule store reader.
//!
//! Reads peers, queues and routes (with their time conditions) into an
//! immutable [`RoutingSnapshot`]. No filtering happens here beyond ordering;
//! unresolved queue references are passed through for the compiler to degrade.

pub mod sqlite;

pub use self::sqlite::SqliteRuleStore;

use async_trait::async_trait;
use micropabx_dialplan::{Peer, Queue, Route, RoutingSnapshot, TimeCondition};

use crate::error::StoreError;

/// Peer row from `ramais`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeerRecord {
    /// Extension number.
    pub ramal: String,
}

/// Queue row from `filas`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueueRecord {
    /// Database primary key.
    pub id: i64,
    /// Queue number.
    pub fila: String,
}

/// Route row from `rotas`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RouteRecord {
    /// Database primary key.
    pub id: i64,
    /// Display name.
    pub nome: String,
    /// Dialed number the route matches.
    pub numero_entrada: String,
    /// Queue id used when no time window matches.
    pub dest_fila_else: Option<i64>,
}

/// Time condition row from `time_conditions`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimeConditionRecord {
    /// Window start, `HH:MM`.
    pub time_start: String,
    /// Window end, `HH:MM`.
    pub time_end: String,
    /// Comma-separated weekday tokens.
    pub days: Option<String>,
    /// Queue id dispatched inside the window.
    pub dest_fila_if_time: Option<i64>,
}

impl From<PeerRecord> for Peer {
    fn from(record: PeerRecord) -> Self {
        Peer {
            number: record.ramal,
        }
    }
}

impl From<QueueRecord> for Queue {
    fn from(record: QueueRecord) -> Self {
        Queue {
            id: record.id,
            number: record.fila,
        }
    }
}

impl From<TimeConditionRecord> for TimeCondition {
    fn from(record: TimeConditionRecord) -> Self {
        TimeCondition {
            start_time: record.time_start,
            end_time: record.time_end,
            days: record.days.unwrap_or_default(),
            matched_queue_id: record.dest_fila_if_time,
        }
    }
}

impl RouteRecord {
    /// Attach the route's time conditions, keeping their order.
    pub fn into_route(self, conditions: Vec<TimeConditionRecord>) -> Route {
        Route {
            id: self.id,
            name: self.nome,
            entry_number: self.numero_entrada,
            fallback_queue_id: self.dest_fila_else,
            time_conditions: conditions.into_iter().map(TimeCondition::from).collect(),
        }
    }
}

/// Read access to the routing rules.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// All peers, ordered by extension number.
    async fn fetch_peers(&self) -> Result<Vec<Peer>, StoreError>;

    /// All queues, ordered by queue number.
    async fn fetch_queues(&self) -> Result<Vec<Queue>, StoreError>;

    /// All routes ordered by name, each with its time conditions attached.
    async fn fetch_routes(&self) -> Result<Vec<Route>, StoreError>;

    /// Read the complete snapshot. Any failure aborts the whole read.
    async fn read_snapshot(&self) -> Result<RoutingSnapshot, StoreError> {
        let peers = self.fetch_peers().await?;
        let queues = self.fetch_queues().await?;
        let routes = self.fetch_routes().await?;
        Ok(RoutingSnapshot {
            peers,
            queues,
            routes,
        })
    }
}
