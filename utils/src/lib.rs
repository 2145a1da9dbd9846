//! Shared utilities for the fitstake oracle.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat};
pub use time::{format_distance, format_duration};
