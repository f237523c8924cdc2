// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Micropabx Dialplan - Routing Rules to Asterisk Dialplan
//!
//! This crate compiles a snapshot of routing rules (peers, queues, inbound
//! routes with time conditions) into the `extensions.conf` text consumed by
//! the telephony switch.
//!
//! # Architecture
//!
//! ```text
//!     ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//!     │  Routing    │      │   Typed     │      │ extensions  │
//!     │  Snapshot   │─────▶│  Dialplan   │─────▶│   .conf     │
//!     │ (store/JSON)│      │  (codegen)  │      │  (writer)   │
//!     └─────────────┘      └─────────────┘      └─────────────┘
//!            │                    ▲
//!            ▼                    │
//!     ┌─────────────┐      ┌─────────────┐
//!     │ Validation  │      │  Recording  │
//!     │ (optional)  │      │   Policy    │
//!     └─────────────┘      └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use micropabx_dialplan::{RecordingPolicy, RoutingSnapshot, compile, write_artifact};
//!
//! let snapshot = RoutingSnapshot::from_json_file("rules.json")?;
//! let recording = RecordingPolicy::from_modules("record,queues");
//! let dialplan = compile(&snapshot, recording);
//! let info = write_artifact("/etc/asterisk/extensions.conf", &dialplan)?;
//! println!("{} bytes, sha256 {}", info.bytes, info.sha256);
//! ```
//!
//! # Important Notes
//!
//! - This crate has **NO database dependencies**. The caller reads the rule
//!   store and hands over an immutable [`RoutingSnapshot`].
//! - The whole artifact is rebuilt on every compile.
//!
//! # Modules
//!
//! - [`model`]: Routing rule snapshot types
//! - [`recording`]: Recording policy from the module list
//! - [`codegen`]: Dialplan statement generation
//! - [`validation`]: Optional rule diagnostics
//! - [`writer`]: Atomic artifact writing

#![deny(missing_docs)]

/// Dialplan statement generation.
pub mod codegen;

/// Routing rule snapshot types.
pub mod model;

/// Recording policy resolution.
pub mod recording;

/// Optional rule diagnostics.
pub mod validation;

/// Atomic artifact writing.
pub mod writer;

pub use codegen::compile;
pub use codegen::statement::{Action, Dialplan, Line, Priority, Statement};
pub use model::{Peer, Queue, Route, RoutingSnapshot, SnapshotError, TimeCondition};
pub use recording::RecordingPolicy;
pub use validation::{ValidationReport, ValidationWarning, validate};
pub use writer::{ArtifactInfo, WriteError, checksum, write_artifact, write_text};
