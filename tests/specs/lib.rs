// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `safewatch` binary.
//!
//! The files under `cli/` are compiled as integration tests of the
//! `safewatch` package (see `crates/cli/Cargo.toml`) so they can locate the
//! built binary.
