// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Peer dispatch emitter.
//!
//! Peers are not emitted one by one. Two wildcard patterns match every
//! internal call and dial the dialed number over SIP.

use super::RuleEmitter;
use crate::codegen::block::{AnswerMode, ExtenBlock};
use crate::codegen::context::EmitContext;
use crate::codegen::statement::{Action, Dialplan, Line};

/// Ring timeout for peer dials.
pub const DIAL_TIMEOUT_SECS: u32 = 20;
/// Dial flags: transfer for callee and caller, ringback tone.
pub const DIAL_OPTIONS: &str = "Ttr";

/// Wildcard pattern matching peer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerPattern(pub &'static str);

/// The fixed peer patterns, in emission order.
pub const PEER_PATTERNS: [PeerPattern; 2] = [PeerPattern("_X"), PeerPattern("_X.")];

impl RuleEmitter for PeerPattern {
    fn emit(&self, ctx: &EmitContext<'_>, out: &mut Dialplan) {
        ExtenBlock::open(&mut *out, self.0)
            .step(Action::NoOp(
                "### Chamada interna para Ramal ${EXTEN} ###".to_string(),
            ))
            .instrumented(ctx.instrumentation(AnswerMode::Always), |b| {
                b.step(Action::Dial {
                    target: "SIP/${EXTEN}".to_string(),
                    timeout_secs: DIAL_TIMEOUT_SECS,
                    options: DIAL_OPTIONS.to_string(),
                });
            })
            .step(Action::Hangup);
        out.push(Line::Blank);
    }
}
