//! Export Configuration Module
//!
//! Segmentation and formatting settings loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `MSW_EXPORT_CONFIG` environment variable (path to TOML file)
//! 2. `msw_export.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Settings are passed explicitly into every export call; there is no
//! process-wide configuration, so exports of different wells never share state.

mod export_config;
pub mod defaults;
pub mod validation;

pub use export_config::*;
