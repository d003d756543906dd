//! HTTP adapter for the TaskPulse push delivery service.

pub mod routes;
pub mod state;
