// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic projections of mutations onto cached collections.
//!
//! A [`Projector`] computes what a collection will look like once the server
//! accepts a mutation. Projections are pure: they never touch the input
//! slice and always return a new collection.

use crate::clock::to_datetime;
use crate::models::{Alert, Camera, Entity, User, UserStatus};
use crate::mutation::{AlertMutation, CameraMutation, UserMutation};
use crate::record::random_suffix;

/// Computes the expected effect of a mutation on a cached collection of `E`.
pub trait Projector<E: Entity> {
    /// Returns the projected collection. `now_ms` seeds provisional ids and
    /// timestamps for created entities.
    fn project(&self, current: &[E], now_ms: u64) -> Vec<E>;
}

/// Temporary identifier for an entity created locally but not yet confirmed.
/// Creates in the same millisecond still get distinct ids.
pub fn temp_id(now_ms: u64) -> String {
    format!("temp-{}-{}", now_ms, random_suffix())
}

/// Returns true if `id` was minted by [`temp_id`].
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with("temp-")
}

fn map_matching<E: Entity>(current: &[E], id: &str, f: impl Fn(&mut E)) -> Vec<E> {
    current
        .iter()
        .map(|e| {
            let mut e = e.clone();
            if e.id() == id {
                f(&mut e);
            }
            e
        })
        .collect()
}

fn remove_matching<E: Entity>(current: &[E], id: &str) -> Vec<E> {
    current.iter().filter(|e| e.id() != id).cloned().collect()
}

fn prepend<E: Entity>(entity: E, current: &[E]) -> Vec<E> {
    let mut out = Vec::with_capacity(current.len() + 1);
    out.push(entity);
    out.extend_from_slice(current);
    out
}

impl Projector<User> for UserMutation {
    fn project(&self, current: &[User], now_ms: u64) -> Vec<User> {
        match self {
            UserMutation::Create(new) => prepend(
                User {
                    id: temp_id(now_ms),
                    name: new.name.clone(),
                    email: new.email.clone(),
                    role: new.role,
                    status: UserStatus::Active,
                    created_at: to_datetime(now_ms),
                },
                current,
            ),
            UserMutation::Update(u) => map_matching(current, &u.user_id, |user| u.changes.apply_to(user)),
            UserMutation::UpdateStatus(s) => {
                let status = s.action.resulting_status();
                map_matching(current, &s.user_id, |user| user.status = status)
            }
            UserMutation::Delete(r) => remove_matching(current, &r.user_id),
        }
    }
}

impl Projector<Camera> for CameraMutation {
    fn project(&self, current: &[Camera], now_ms: u64) -> Vec<Camera> {
        match self {
            CameraMutation::Create(new) => prepend(
                Camera {
                    id: temp_id(now_ms),
                    name: new.name.clone(),
                    location: new.location.clone(),
                    stream_url: new.stream_url.clone(),
                    is_active: true,
                    alert_count: 0,
                    created_at: to_datetime(now_ms),
                },
                current,
            ),
            CameraMutation::Update(u) => {
                map_matching(current, &u.camera_id, |camera| u.changes.apply_to(camera))
            }
            CameraMutation::UpdateStatus(s) => {
                map_matching(current, &s.camera_id, |camera| camera.is_active = s.is_active)
            }
            CameraMutation::Delete(r) => remove_matching(current, &r.camera_id),
        }
    }
}

impl Projector<Alert> for AlertMutation {
    fn project(&self, current: &[Alert], _now_ms: u64) -> Vec<Alert> {
        match self {
            AlertMutation::Update(u) => map_matching(current, &u.alert_id, |alert| u.changes.apply_to(alert)),
        }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
