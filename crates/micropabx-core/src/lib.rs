// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Micropabx Core - Dialplan Reload
//!
//! Reads the routing rules from the SQLite rule store, compiles them with
//! [`micropabx_dialplan`], and atomically replaces the switch's
//! `extensions.conf`.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Rule Store  │───▶│   Snapshot   │───▶│   Compile    │───▶│    Write     │
//! │   (SQLite)   │    │  (immutable) │    │ (+recording) │    │   (atomic)   │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! One invocation runs the pipeline once and exits. The store connection is
//! acquired at the start and released before compiling; every store call is
//! bounded by `MICROPABX_STORE_TIMEOUT_SECS`.
//!
//! # Failure Modes
//!
//! | Error | Code | Artifact |
//! |-------|------|----------|
//! | Store unreachable, query failed, or timed out | `STORE_UNAVAILABLE` | untouched |
//! | Destination not writable | `WRITE_FAILED` | previous version kept |
//! | Bad configuration | `CONFIG_ERROR` | untouched |
//!
//! Queue references that do not resolve are not errors; the compiler drops
//! the affected branch.
//!
//! # Configuration
//!
//! See [`config::Config::from_env`].

#![deny(missing_docs)]

/// Configuration loaded from environment variables.
pub mod config;

/// Error types.
pub mod error;

/// Embedded rule store schema.
pub mod migrations;

/// The reload pipeline.
pub mod reload;

/// Rule store reader.
pub mod store;

pub use config::{Config, ConfigError};
pub use error::{Error, StoreError};
pub use reload::{ReloadOptions, ReloadOutcome, compile_and_write, reload};
pub use store::{RuleStore, SqliteRuleStore};
