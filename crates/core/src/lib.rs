// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sw-core: Shared domain types for the safewatch sync queue.
//!
//! This crate holds the I/O-free pieces: entity models, the typed mutation
//! union, queued operation records, optimistic projections and the clock
//! abstraction. Persistence, delivery and triggers live in the `safewatch`
//! crate.

pub mod clock;
pub mod entity;
pub mod error;
pub mod models;
pub mod mutation;
pub mod project;
pub mod record;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::{Action, EntityType};
pub use error::{Error, Result};
pub use models::{
    Alert, AlertPatch, AlertStatus, Camera, CameraPatch, Entity, NewCamera, NewUser, Role,
    Severity, User, UserPatch, UserStatus, UserStatusAction,
};
pub use mutation::{
    AlertMutation, AlertUpdate, CameraMutation, CameraRef, CameraStatusChange, CameraUpdate,
    Mutation, UserMutation, UserRef, UserStatusChange, UserUpdate,
};
pub use project::{is_temp_id, temp_id, Projector};
pub use record::{generate_record_id, OperationRecord, QueueStatus};
