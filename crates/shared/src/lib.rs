//! Shared utilities and common types for Wellbeing Monitor.
//!
//! This crate provides common functionality used across all other crates:
//! - Duration formatting for user-facing notification text
//! - Local-midnight scheduling math
//! - Percentage-of-goal helpers

pub mod time;
