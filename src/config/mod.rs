//! Configuration module for StackSearch-RS
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are loaded once at startup and travel through application state;
//! there is no global settings cell.

mod settings;

pub use settings::*;
