// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::storage::StoreError;
use crate::sync::{ExecutorError, SyncError};

/// All possible errors that can occur in the swrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'safewatch init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid API URL: '{0}'\n  hint: the URL must start with http:// or https://")]
    InvalidApiUrl(String),

    #[error("invalid payload JSON: {0}\n  hint: pass a JSON object, e.g. --payload '{{\"userId\":\"42\",\"action\":\"Block\"}}'")]
    InvalidPayloadJson(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] sw_core::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("remote error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SyncError> for Error {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Core(e) => Error::Core(e),
            SyncError::Store(e) => Error::Store(e),
        }
    }
}

/// A specialized Result type for swrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
