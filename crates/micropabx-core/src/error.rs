// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for micropabx-core.

use micropabx_dialplan::WriteError;

use crate::config::ConfigError;

/// Result type using the top-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Rule store failures.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached, queried, or did not answer in time.
    #[error("rule store unavailable during '{operation}': {details}")]
    StoreUnavailable {
        /// The operation that failed.
        operation: String,
        /// Error details.
        details: String,
    },
}

impl StoreError {
    pub(crate) fn unavailable(operation: impl Into<String>, details: impl ToString) -> Self {
        Self::StoreUnavailable {
            operation: operation.into(),
            details: details.to_string(),
        }
    }
}

/// Fatal reload errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The rule store failed; no artifact was touched.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The artifact could not be written; the previous one is intact.
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl Error {
    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Store(_) => "STORE_UNAVAILABLE",
            Self::Write(_) => "WRITE_FAILED",
        }
    }
}
