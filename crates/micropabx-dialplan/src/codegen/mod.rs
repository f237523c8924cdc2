// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dialplan code generation.
//!
//! Lowers a [`RoutingSnapshot`] into typed [`statement::Line`] values,
//! grouped into three families emitted back to back: inbound routes, queue
//! dispatch, and peer dispatch. Output depends only on the snapshot and the
//! recording policy, so equal inputs give byte-identical artifacts.

pub mod block;
pub mod context;
pub mod rules;
pub mod statement;

use std::time::Instant;

use context::EmitContext;
use rules::{PEER_PATTERNS, emit_family};
use statement::{Dialplan, Line};

use crate::model::RoutingSnapshot;
use crate::recording::RecordingPolicy;

/// Dialplan context every generated extension lives in.
pub const CONTEXT_NAME: &str = "interno";
/// Hand-maintained file included ahead of the generated rules.
pub const CUSTOM_INCLUDE: &str = "extensions_custom.conf";

const ROUTES_SECTION: &str = "--- Regras Customizadas: Rotas de Entrada ---";
const QUEUES_SECTION: &str = "--- Regra Automatica: Chamadas para Filas ---";
const PEERS_SECTION: &str = "--- Regra Automatica: Chamadas para outros Ramais ---";

/// Compile a routing snapshot to a dialplan.
///
/// Unresolved queue references never fail the compile: the affected else
/// target or window branch is left out.
pub fn compile(snapshot: &RoutingSnapshot, recording: RecordingPolicy) -> Dialplan {
    let start = Instant::now();
    let ctx = EmitContext::new(recording, &snapshot.queues);
    let mut out = Dialplan::new();

    emit_preamble(&mut out);
    emit_family(ROUTES_SECTION, &snapshot.routes, &ctx, &mut out);
    emit_family(QUEUES_SECTION, &snapshot.queues, &ctx, &mut out);
    emit_family(PEERS_SECTION, &PEER_PATTERNS, &ctx, &mut out);

    tracing::debug!(
        routes = snapshot.routes.len(),
        queues = snapshot.queues.len(),
        peers = snapshot.peers.len(),
        recording = recording.is_enabled(),
        lines = out.lines().len(),
        codegen_duration_us = start.elapsed().as_micros() as u64,
        "Dialplan generated"
    );

    out
}

/// Fixed header: generator notice, context, custom include.
fn emit_preamble(out: &mut Dialplan) {
    out.push(Line::Comment(
        "Arquivo gerado automaticamente pelo Micro PABX".to_string(),
    ));
    out.push(Line::Context {
        name: CONTEXT_NAME.to_string(),
        comment: "Contexto Unificado para todas as chamadas".to_string(),
    });
    out.push(Line::Blank);
    out.push(Line::Comment("--- Include extensions_custom --------".to_string()));
    out.push(Line::Include(CUSTOM_INCLUDE.to_string()));
    out.push(Line::Blank);
}
