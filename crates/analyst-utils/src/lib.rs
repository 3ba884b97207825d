//! Shared utilities for analyst-rs
//!
//! This crate provides common functionality used across the analyst-rs workspace:
//! tracing setup and environment-variable lookup.

pub mod config;
pub mod logging;

pub use config::{EnvSource, ProcessEnv, load_dotenv};
pub use logging::init_tracing;
