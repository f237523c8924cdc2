// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Queue dispatch emitter.
//!
//! The pattern is the queue's own number, but the call is forwarded with
//! the dialed number (`${EXTEN}`).

use super::RuleEmitter;
use crate::codegen::block::{AnswerMode, ExtenBlock};
use crate::codegen::context::EmitContext;
use crate::codegen::statement::{Action, Dialplan, Line};
use crate::model::Queue;

impl RuleEmitter for Queue {
    fn emit(&self, ctx: &EmitContext<'_>, out: &mut Dialplan) {
        ExtenBlock::open(&mut *out, self.number.as_str())
            .step(Action::NoOp(
                "### Chamada interna para Fila ${EXTEN} ###".to_string(),
            ))
            .instrumented(ctx.instrumentation(AnswerMode::Always), |b| {
                b.step(Action::Queue("${EXTEN}".to_string()));
            })
            .step(Action::Hangup);
        out.push(Line::Blank);
    }
}
