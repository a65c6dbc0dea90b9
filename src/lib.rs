//! Leave Balance & Capacity Analytics Engine
//!
//! This crate turns a snapshot of a team's leave records (policy, member shift
//! schedules, and leave requests) into per-member and per-team projections:
//! remaining balance, usable days under a shared concurrent-leave ceiling,
//! realistic usable days, and projected carryover and forfeiture.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
