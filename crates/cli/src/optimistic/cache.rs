// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sw_core::Entity;

#[derive(Debug)]
struct CacheState<E> {
    items: Vec<E>,
    stale: bool,
}

/// Shared cached collection of one entity type. Clones see the same data.
#[derive(Debug)]
pub struct EntityCache<E> {
    state: Arc<RwLock<CacheState<E>>>,
}

impl<E> Clone for EntityCache<E> {
    fn clone(&self) -> Self {
        EntityCache {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<E: Entity> EntityCache<E> {
    pub fn new(items: Vec<E>) -> Self {
        EntityCache {
            state: Arc::new(RwLock::new(CacheState {
                items,
                stale: false,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState<E>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState<E>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Vec<E> {
        self.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<E> {
        self.read().items.iter().find(|e| e.id() == id).cloned()
    }

    /// Installs authoritative data and clears the stale flag.
    pub fn replace(&self, items: Vec<E>) {
        let mut state = self.write();
        state.items = items;
        state.stale = false;
    }

    /// Puts back a previous snapshot. The stale flag is left alone.
    pub fn restore(&self, items: Vec<E>) {
        self.write().items = items;
    }

    /// Applies `f` atomically and returns the collection as it was before.
    pub fn update(&self, f: impl FnOnce(&[E]) -> Vec<E>) -> Vec<E> {
        let mut state = self.write();
        let next = f(&state.items);
        std::mem::replace(&mut state.items, next)
    }

    pub fn invalidate(&self) {
        self.write().stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.read().stale
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
