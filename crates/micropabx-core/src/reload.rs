// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The reload pipeline: read the rule store, compile, write the artifact.
//!
//! A store failure aborts before anything is written. A write failure leaves
//! the previous artifact in place.

use std::time::Instant;

use micropabx_dialplan::{
    ArtifactInfo, RecordingPolicy, RoutingSnapshot, ValidationWarning, compile, validate,
    write_artifact,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::migrations;
use crate::store::{RuleStore, SqliteRuleStore};

/// Optional reload steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReloadOptions {
    /// Run the validation pass and log its warnings.
    pub validate: bool,
    /// Apply the embedded schema before reading.
    pub migrate: bool,
}

/// Result of a successful reload.
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    /// The written artifact.
    pub artifact: ArtifactInfo,
    /// Validation warnings; empty unless validation was requested.
    pub warnings: Vec<ValidationWarning>,
    /// Number of routes compiled.
    pub routes: usize,
    /// Number of queues compiled.
    pub queues: usize,
    /// Number of peers in the store.
    pub peers: usize,
}

/// Run one reload against the configured store and destination.
pub async fn reload(config: &Config, options: ReloadOptions) -> Result<ReloadOutcome> {
    let started = Instant::now();

    let store = SqliteRuleStore::connect(&config.database_url, config.store_timeout).await?;

    if options.migrate {
        let applied = migrations::run_sqlite(store.pool())
            .await
            .map_err(|e| StoreError::unavailable("migrate", e));
        if let Err(e) = applied {
            store.close().await;
            return Err(e.into());
        }
        info!("Rule store schema applied");
    }

    let snapshot = store.read_snapshot().await;
    store.close().await;
    let snapshot = snapshot?;

    info!(
        routes = snapshot.routes.len(),
        queues = snapshot.queues.len(),
        peers = snapshot.peers.len(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Rule store read"
    );

    compile_and_write(config, options, snapshot)
}

/// Compile a snapshot and write it to the configured destination.
pub fn compile_and_write(
    config: &Config,
    options: ReloadOptions,
    snapshot: RoutingSnapshot,
) -> Result<ReloadOutcome> {
    let started = Instant::now();

    let warnings = if options.validate {
        let report = validate(&snapshot);
        for warning in &report.warnings {
            warn!(code = warning.code(), "{}", warning);
        }
        report.warnings
    } else {
        Vec::new()
    };

    let recording = RecordingPolicy::from_modules(&config.modules);
    let dialplan = compile(&snapshot, recording);
    let artifact = write_artifact(&config.extensions_conf, &dialplan)?;

    info!(
        recording = recording.is_enabled(),
        statements = dialplan.statements().count(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Dialplan compiled"
    );

    Ok(ReloadOutcome {
        artifact,
        warnings,
        routes: snapshot.routes.len(),
        queues: snapshot.queues.len(),
        peers: snapshot.peers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use micropabx_dialplan::{Queue, Route};
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    fn config(output: PathBuf, modules: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            extensions_conf: output,
            modules: modules.to_string(),
            store_timeout: Duration::from_secs(5),
        }
    }

    fn dangling_snapshot() -> RoutingSnapshot {
        RoutingSnapshot {
            peers: vec![],
            queues: vec![Queue {
                id: 1,
                number: "600".to_string(),
            }],
            routes: vec![Route {
                id: 1,
                name: "Suporte".to_string(),
                entry_number: "3000".to_string(),
                fallback_queue_id: Some(99),
                time_conditions: vec![],
            }],
        }
    }

    #[test]
    fn test_compile_and_write_without_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extensions.conf");

        let outcome = compile_and_write(
            &config(path.clone(), ""),
            ReloadOptions::default(),
            dangling_snapshot(),
        )
        .unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.routes, 1);
        assert_eq!(outcome.queues, 1);
        assert_eq!(outcome.peers, 0);
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.len(), outcome.artifact.bytes);
        assert!(!written.contains("MixMonitor"));
    }

    #[test]
    fn test_compile_and_write_collects_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let options = ReloadOptions {
            validate: true,
            migrate: false,
        };

        let outcome = compile_and_write(
            &config(dir.path().join("extensions.conf"), "record"),
            options,
            dangling_snapshot(),
        )
        .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code(), "W001");
    }

    #[test]
    fn test_compile_and_write_reports_write_failure() {
        let err = compile_and_write(
            &config(PathBuf::from("/nonexistent-dir/extensions.conf"), ""),
            ReloadOptions::default(),
            dangling_snapshot(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Write(_)));
        assert_eq!(err.error_code(), "WRITE_FAILED");
    }
}
