//! Shared types, errors, configuration and database helpers for the
//! TaskPulse push delivery service.

pub mod config;
pub mod db;
pub mod error;
pub mod types;
