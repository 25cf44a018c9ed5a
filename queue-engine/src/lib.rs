//! Salon queue engine
//!
//! In-memory queue management core for the salon booking application:
//! per-salon ordered queues, a strict service state machine, derived
//! statistics and position-based wait estimates. The surrounding
//! application (booking flow, dashboards, real-time transport) talks
//! to the [`queue::QueueSession`] facade; all state lives in the
//! injected [`queue::QueueStore`].

pub mod config;
pub mod queue;

pub use config::QueueConfig;
pub use queue::{QueueSession, QueueStore, StoreError, StoreResult};
