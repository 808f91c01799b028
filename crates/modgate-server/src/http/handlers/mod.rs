//! HTTP request handlers.

mod classify;
mod health;
mod status;

pub use classify::submit_classification;
pub use health::{health_check, metrics_handler};
pub use status::get_status;
