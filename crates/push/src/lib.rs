//! Web-push delivery pipeline: subscription store, payload encoding,
//! per-endpoint delivery and the fan-out orchestrator.

pub mod fanout;
pub mod payload;
pub mod store;
pub mod worker;
