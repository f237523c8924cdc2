// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Rule emitters.
//!
//! Each rule family has its own emitter that appends the extension line
//! group for one rule.

pub mod peers;
pub mod queues;
pub mod routes;

use super::context::EmitContext;
use super::statement::{Dialplan, Line};

pub use peers::{PEER_PATTERNS, PeerPattern};

/// Trait for emitting the dialplan lines of one rule.
pub trait RuleEmitter {
    /// Append this rule's lines to `out`.
    fn emit(&self, ctx: &EmitContext<'_>, out: &mut Dialplan);
}

/// Emit a family section marker followed by every rule, in order.
///
/// Nothing is emitted for an empty family.
pub fn emit_family<R: RuleEmitter>(
    title: &str,
    rules: &[R],
    ctx: &EmitContext<'_>,
    out: &mut Dialplan,
) {
    if rules.is_empty() {
        return;
    }
    out.push(Line::Blank);
    out.push(Line::Comment(title.to_string()));
    for rule in rules {
        rule.emit(ctx, out);
    }
}
