// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Micropabx Reload
//!
//! Rebuilds `extensions.conf` from the rule store. Run after every rule
//! change, then tell the switch to reload its dialplan.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use micropabx_core::{Config, Error, ReloadOptions, reload};

/// Rebuild the Asterisk dialplan from the routing rule store.
#[derive(Debug, Parser)]
#[command(name = "micropabx-reload", version)]
struct Args {
    /// Rule store URL (overrides MICROPABX_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Artifact destination (overrides MICROPABX_EXTENSIONS_CONF)
    #[arg(long)]
    output: Option<String>,

    /// Licensed modules (overrides MICROPABX_MODULES)
    #[arg(long)]
    modules: Option<String>,

    /// Store timeout in seconds (overrides MICROPABX_STORE_TIMEOUT_SECS)
    #[arg(long)]
    store_timeout_secs: Option<u64>,

    /// Report unresolved references and suspicious rule data
    #[arg(long)]
    validate: bool,

    /// Apply the embedded schema before reading
    #[arg(long)]
    migrate: bool,
}

impl Args {
    fn override_for(&self, key: &str) -> Option<String> {
        match key {
            "MICROPABX_DATABASE_URL" => self.database_url.clone(),
            "MICROPABX_EXTENSIONS_CONF" => self.output.clone(),
            "MICROPABX_MODULES" => self.modules.clone(),
            "MICROPABX_STORE_TIMEOUT_SECS" => self.store_timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "micropabx_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<Error>().map_or("INTERNAL", Error::error_code);
            error!(code, "Reload failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from_lookup(|key| {
        args.override_for(key)
            .or_else(|| std::env::var(key).ok())
    })
    .map_err(Error::from)?;

    info!(
        output = %config.extensions_conf.display(),
        modules = %config.modules,
        store_timeout_secs = config.store_timeout.as_secs(),
        "Configuration loaded"
    );

    let options = ReloadOptions {
        validate: args.validate,
        migrate: args.migrate,
    };
    let outcome = reload(&config, options).await?;

    info!(
        path = %outcome.artifact.path.display(),
        bytes = outcome.artifact.bytes,
        sha256 = %outcome.artifact.sha256,
        warnings = outcome.warnings.len(),
        "Reload complete"
    );
    Ok(())
}
