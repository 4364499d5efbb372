//! Configuration module for Email-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the documented defaults,
//! so a run can also be configured entirely from the command line.
//!
//! # Example
//!
//! ```no_run
//! use email_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Pages per domain: {}", config.collector.max_pages_per_domain);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollectorConfig, Config, OutputConfig, SearchConfig, UserAgentConfig, DEFAULT_CSV_PATH,
    DEFAULT_SEARCH_ENDPOINT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
