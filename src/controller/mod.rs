//! # Controller
//!
//! Core broker modules.
//!
//! - `reconciler`: create-or-adopt reconciliation and sweep
//! - `wait`: timeout-bounded polling used while waiting for ACTIVE

pub mod reconciler;
pub mod wait;
