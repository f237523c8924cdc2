// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SQLite-backed rule store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use micropabx_dialplan::{Peer, Queue, Route};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::debug;

use crate::error::StoreError;

use super::{PeerRecord, QueueRecord, RouteRecord, RuleStore, TimeConditionRecord};

/// SQLite-backed rule store. Every read is bounded by the store timeout.
#[derive(Clone)]
pub struct SqliteRuleStore {
    pool: SqlitePool,
    timeout: Duration,
}

impl SqliteRuleStore {
    /// Create a store over an existing pool.
    pub fn new(pool: SqlitePool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Connect to the store at `url`, giving up after `timeout`.
    ///
    /// The database is not created if missing.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let connect = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(timeout)
            .connect(url);

        let pool = bounded("connect", timeout, connect).await?;
        debug!("Rule store connection established");
        Ok(Self::new(pool, timeout))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Release the connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_conditions(&self, route_id: i64) -> Result<Vec<TimeConditionRecord>, StoreError> {
        let query = sqlx::query_as::<_, TimeConditionRecord>(
            r#"
            SELECT CAST(time_start AS TEXT) AS time_start,
                   CAST(time_end AS TEXT) AS time_end,
                   days, dest_fila_if_time
            FROM time_conditions
            WHERE rota_id = ?
            ORDER BY id
            "#,
        )
        .bind(route_id)
        .fetch_all(&self.pool);

        bounded("fetch_time_conditions", self.timeout, query).await
    }
}

async fn bounded<T, F>(operation: &str, timeout: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StoreError::unavailable(operation, e)),
        Err(_) => Err(StoreError::unavailable(
            operation,
            format!("timed out after {:?}", timeout),
        )),
    }
}

#[async_trait]
impl RuleStore for SqliteRuleStore {
    async fn fetch_peers(&self) -> Result<Vec<Peer>, StoreError> {
        let query = sqlx::query_as::<_, PeerRecord>(
            "SELECT CAST(ramal AS TEXT) AS ramal FROM ramais ORDER BY ramais.ramal",
        )
        .fetch_all(&self.pool);

        let records = bounded("fetch_peers", self.timeout, query).await?;
        Ok(records.into_iter().map(Peer::from).collect())
    }

    async fn fetch_queues(&self) -> Result<Vec<Queue>, StoreError> {
        let query = sqlx::query_as::<_, QueueRecord>(
            "SELECT id, CAST(fila AS TEXT) AS fila FROM filas ORDER BY filas.fila",
        )
        .fetch_all(&self.pool);

        let records = bounded("fetch_queues", self.timeout, query).await?;
        Ok(records.into_iter().map(Queue::from).collect())
    }

    async fn fetch_routes(&self) -> Result<Vec<Route>, StoreError> {
        let query = sqlx::query_as::<_, RouteRecord>(
            r#"
            SELECT id, nome, CAST(numero_entrada AS TEXT) AS numero_entrada, dest_fila_else
            FROM rotas
            ORDER BY rotas.nome
            "#,
        )
        .fetch_all(&self.pool);

        let records = bounded("fetch_routes", self.timeout, query).await?;

        let mut routes = Vec::with_capacity(records.len());
        for record in records {
            let conditions = self.fetch_conditions(record.id).await?;
            debug!(
                route = %record.nome,
                conditions = conditions.len(),
                "Route loaded"
            );
            routes.push(record.into_route(conditions));
        }
        Ok(routes)
    }
}
