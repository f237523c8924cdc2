// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recording policy resolution from the licensed module list.

/// Module token that turns on call recording.
pub const RECORD_MODULE: &str = "record";

/// Whether call-handling blocks get MixMonitor instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingPolicy {
    /// No instrumentation lines are emitted.
    #[default]
    Disabled,
    /// Every dispatch block is wrapped with start/stop recording.
    Enabled,
}

impl RecordingPolicy {
    /// Resolve the policy from a comma-separated, case-insensitive module list.
    ///
    /// Anything that does not contain a `record` token, including blank or
    /// garbled input, resolves to [`RecordingPolicy::Disabled`].
    pub fn from_modules(modules: &str) -> Self {
        let enabled = modules
            .split(',')
            .any(|token| token.trim().eq_ignore_ascii_case(RECORD_MODULE));
        if enabled { Self::Enabled } else { Self::Disabled }
    }

    /// True when recording instrumentation must be emitted.
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_token_enables() {
        assert_eq!(
            RecordingPolicy::from_modules("record"),
            RecordingPolicy::Enabled
        );
        assert_eq!(
            RecordingPolicy::from_modules("record,other"),
            RecordingPolicy::Enabled
        );
        assert_eq!(
            RecordingPolicy::from_modules("queues,RECORD"),
            RecordingPolicy::Enabled
        );
        assert_eq!(
            RecordingPolicy::from_modules("queues, Record ,reports"),
            RecordingPolicy::Enabled
        );
    }

    #[test]
    fn test_blank_or_malformed_disables() {
        for input in ["", " ", ",,,", "recording", "rec,ord", "norecord", ";record;"] {
            assert_eq!(
                RecordingPolicy::from_modules(input),
                RecordingPolicy::Disabled,
                "input {:?} should not enable recording",
                input
            );
        }
    }

    #[test]
    fn test_is_enabled() {
        assert!(RecordingPolicy::Enabled.is_enabled());
        assert!(!RecordingPolicy::Disabled.is_enabled());
        assert!(!RecordingPolicy::default().is_enabled());
    }
}
