// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for AMF export

use crate::progress::Phase;
use thiserror::Error;

/// Result type for export operations
pub type AmfResult<T> = Result<T, AmfError>;

/// Errors surfaced by the exporter and its host glue
#[derive(Debug, Error)]
pub enum AmfError {
    /// The sink rejected a write. Never retried.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The progress host asked to stop. The document written so far is not
    /// valid output.
    #[error("export cancelled during {phase} phase after {completed} of {total} steps")]
    Cancelled {
        phase: Phase,
        completed: u64,
        total: u64,
    },

    /// Imported mesh failed validation
    #[error("invalid mesh: {message}")]
    InvalidMesh { message: String },

    /// Unrecognized mesh file extension
    #[error("unknown mesh format: .{extension}")]
    UnknownFormat { extension: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl AmfError {
    /// Create an `InvalidMesh` error with the given message.
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// Whether this error is the cooperative cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
