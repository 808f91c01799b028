//! ModGate Server Library
//!
//! This crate provides the moderation service around the decision pipeline:
//! task admission over HTTP, the FIFO task queue, the worker pool, the
//! in-memory result store and the datastore notifier.

pub mod config;
pub mod datastore;
pub mod http;
pub mod metrics;
pub mod models;
pub mod queue;
pub mod state;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use datastore::{NoopNotifier, PostgresNotifier, StatusNotifier};
pub use queue::TaskQueue;
pub use state::AppState;
pub use store::ResultStore;
pub use worker::{Worker, WorkerPool};
