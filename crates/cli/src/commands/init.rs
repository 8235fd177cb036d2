// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use crate::config::init_work_dir;
use crate::error::Result;

pub fn run(api_url: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let work_dir = run_impl(&target_path, api_url.as_deref())?;
    println!("Initialized safewatch at {}", work_dir.display());
    Ok(())
}

pub(crate) fn run_impl(target_path: &Path, api_url: Option<&str>) -> Result<PathBuf> {
    if !target_path.exists() {
        std::fs::create_dir_all(target_path)?;
    }
    let work_dir = init_work_dir(target_path, api_url)?;
    tracing::info!(work_dir = %work_dir.display(), "initialized");
    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
