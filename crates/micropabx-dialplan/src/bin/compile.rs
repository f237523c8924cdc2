// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dialplan compiler CLI
//!
//! Compiles a routing snapshot JSON file to an `extensions.conf` dialplan.
//!
//! Usage:
//!
//! ```text
//! micropabx-compile --snapshot <path> [--modules <flags>] [--output <path>] [--validate]
//! ```
//!
//! Example:
//!
//! ```text
//! micropabx-compile --snapshot rules.json --modules record --output ./extensions.conf
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use micropabx_dialplan::{RecordingPolicy, RoutingSnapshot, compile, validate, write_artifact};

/// Compile a routing snapshot JSON file to an Asterisk dialplan.
#[derive(Debug, Parser)]
#[command(name = "micropabx-compile", version)]
struct Args {
    /// Path to the routing snapshot JSON file
    #[arg(long)]
    snapshot: PathBuf,

    /// Comma-separated licensed modules; `record` enables call recording
    #[arg(long, env = "MICROPABX_MODULES", default_value = "")]
    modules: String,

    /// Write the artifact here instead of printing it to stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Report unresolved references and suspicious rule data
    #[arg(long)]
    validate: bool,
}

fn main() -> ExitCode {
    // Initialize minimal logging (default to warn if RUST_LOG not set)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let snapshot = match RoutingSnapshot::from_json_file(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.validate {
        let report = validate(&snapshot);
        for warning in &report.warnings {
            tracing::warn!(warning = %warning, "Routing rule warning");
        }
        eprintln!("Validation: {} warning(s)", report.warnings.len());
    }

    let recording = RecordingPolicy::from_modules(&args.modules);
    let dialplan = compile(&snapshot, recording);

    match args.output {
        Some(path) => match write_artifact(&path, &dialplan) {
            Ok(info) => {
                eprintln!("Dialplan written:");
                eprintln!("  Size: {} bytes", info.bytes);
                eprintln!("  Checksum: {}", info.sha256);
                println!("{}", info.path.display());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(dialplan.render().as_bytes()) {
                eprintln!("Error writing to stdout: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
