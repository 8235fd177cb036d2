// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic updates over the sync queue.
//!
//! The UI keeps one [`EntityCache`] per entity type. [`OptimisticBridge`]
//! projects each mutation onto the cache before it is queued, so the change
//! shows up immediately, and later reconciles the cache with what actually
//! happened: a delivery marks the cache stale for refetch, an eviction puts
//! the pre-mutation snapshot back.

mod bridge;
mod cache;

pub use bridge::{OptimisticBridge, PendingUpdate, UpdateState};
pub use cache::EntityCache;
