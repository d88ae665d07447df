// SPDX-FileCopyrightText: 2026 gwconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the gwconf assembler.

use thiserror::Error;

use crate::types::{ResourceKey, ResourceKind};

/// The primary error type used across gwconf crates.
#[derive(Debug, Error)]
pub enum GwconfError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Resource store errors.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by a [`Storer`](crate::traits::Storer) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested resource does not exist.
    #[error("{kind} {key} not found")]
    NotFound { kind: ResourceKind, key: ResourceKey },

    /// The resource exists but cannot be used as stored.
    #[error("invalid {kind} {key}: {message}")]
    Invalid {
        kind: ResourceKind,
        key: ResourceKey,
        message: String,
    },

    /// The backing source could not be read.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns true if the error means the resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
