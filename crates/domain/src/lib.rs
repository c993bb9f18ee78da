//! Domain layer for Wellbeing Monitor.
//!
//! This crate contains:
//! - Domain models (usage snapshots, goals, status buckets, analysis results)
//! - Pure business-logic services (goal sync, fallback classifier, insights)
//! - The notification sink abstraction

pub mod models;
pub mod services;
