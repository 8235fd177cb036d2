// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Seams between the sync engine and the remote API.
//!
//! The engine only knows [`RemoteExecutor`]; the optimistic bridge only
//! knows [`CollectionSource`]; unload flushing only knows [`Beacon`]. The
//! HTTP implementation of all three lives in [`super::http`].

use std::future::Future;
use std::pin::Pin;

use sw_core::{Entity, Mutation, OperationRecord};

/// Error type for remote calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server failed while handling the request.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },

    /// The server refused the request.
    #[error("request rejected with {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The queued record could not be turned into a request.
    #[error("undeliverable record: {0}")]
    Undeliverable(String),

    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ExecutorError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// Informational only: every failure consumes one retry either way.
    pub fn is_transient(&self) -> bool {
        match self {
            ExecutorError::Network(_) | ExecutorError::Server { .. } => true,
            ExecutorError::Rejected { status, .. } => *status == 408 || *status == 429,
            ExecutorError::Undeliverable(_)
            | ExecutorError::InvalidResponse(_)
            | ExecutorError::Setup(_) => false,
        }
    }
}

/// Result type for remote calls.
pub type ExecResult<T> = Result<T, ExecutorError>;

/// Performs one queued mutation against the remote API.
pub trait RemoteExecutor: Send + Sync {
    /// Delivers `mutation`. `record_id` is stable across retries and is
    /// sent as the idempotency key.
    fn execute<'a>(
        &'a self,
        record_id: &'a str,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = ExecResult<()>> + Send + 'a>>;
}

/// Source of authoritative entity collections, used to confirm optimistic
/// state.
pub trait CollectionSource<E: Entity>: Send + Sync {
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = ExecResult<Vec<E>>> + Send + '_>>;
}

/// Best-effort, fire-and-forget delivery used when the process is going away.
pub trait Beacon: Send + Sync {
    /// Hands `records` off for delivery. Returns whether the hand-off was
    /// accepted; delivery itself is never confirmed.
    fn send(&self, records: Vec<OperationRecord>) -> bool;

    /// Resolves once every send handed off so far has finished or given up.
    /// Hosts await this before tearing the runtime down.
    fn settle(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(std::future::ready(()))
    }
}
