// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embedded rule store schema.
//!
//! The reload only reads the store; these migrations bootstrap an empty
//! database for development and tests.
//!
//! # Example
//!
//! ```ignore
//! use sqlx::SqlitePool;
//! use micropabx_core::migrations;
//!
//! let pool = SqlitePool::connect("sqlite:pabx.db?mode=rwc").await?;
//! migrations::run_sqlite(&pool).await?;
//! ```

use sqlx::migrate::MigrateError;

/// SQLite migrator with the rule store schema embedded.
pub static SQLITE: sqlx::migrate::Migrator = sqlx::migrate!("./migrations/sqlite");

/// Run SQLite migrations.
///
/// Already-applied migrations are skipped.
pub async fn run_sqlite(pool: &sqlx::SqlitePool) -> Result<(), MigrateError> {
    SQLITE.run(pool).await
}
