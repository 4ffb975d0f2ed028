//! Configuration module for Provider-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The configuration is loaded once at process start and handed to the crawler
//! and loader at construction.
//!
//! # Example
//!
//! ```no_run
//! use provider_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CommitPolicy, Config, CrawlMode, CrawlerConfig, DatabaseConfig, DepartmentsConfig,
    OutputConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
