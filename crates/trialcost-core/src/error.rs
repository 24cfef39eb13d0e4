// SPDX-FileCopyrightText: 2026 Trialcost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the trialcost workspace.

use thiserror::Error;

/// The error type returned by estimation, row sources, and configuration.
#[derive(Debug, Error)]
pub enum TrialCostError {
    /// A caller-supplied input was malformed (negative time, unserializable row).
    #[error("invalid input `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Row source backend errors (database open, query failure, row conversion).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failure to serialize an estimate or report.
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrialCostError {
    /// Build an [`TrialCostError::InvalidInput`] for the named input.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Malformed input and configuration never become valid on retry; storage
    /// failures (a locked database, a missing file that appears later) might.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Internal(_))
    }
}
