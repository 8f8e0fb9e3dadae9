//! Assistant Configuration Module
//!
//! TOML configuration for the server, knowledge base source, matching thresholds,
//! user-facing messages and the generative provider.
//!
//! ## Loading Order
//!
//! 1. `FAQ_ASSIST_CONFIG` environment variable (path to TOML file)
//! 2. `faq_assist.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is owned by `AssistService`; there is no process-wide copy.

mod assist_config;
pub mod defaults;
pub mod validation;

pub use assist_config::*;
