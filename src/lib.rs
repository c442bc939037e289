//! # Recon Hunter
//!
//! A modular reconnaissance aggregator for emails, usernames and files.
//!
//! ## Features
//!
//! - **Modular**: every scanner implements one async trait
//! - **Isolated**: a module logs its own failures and returns `None`
//! - **Concurrent**: modules can be driven together on one task
//! - **Configurable**: `.env`, TOML file and environment variables
//!
//! ## Architecture
//!
//! - `ReconModule`: the scanner contract (`name`, `description`, `run`)
//! - `HttpFetch`: blocking HTTP transport, libcurl by default
//! - `ScanLogger`: leveled sink injected into each module
//!
//! ## Example
//!
//! ```rust,no_run
//! use recon_hunter::modules::FootprintTracker;
//! use recon_hunter::core::ReconModule;
//!
//! # async fn demo() {
//! let tracker = FootprintTracker::new();
//! // Logs UPI provider, profile hits and search dorks
//! let findings = tracker.run("alice@okaxis").await;
//! assert!(findings.is_none());
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod modules;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{Config, Findings, ModuleOutcome, ReconError, ReconModule, Result, ScanReport};

pub use crate::modules::{all_modules, get_module, run_all, ModuleContext};
pub use crate::utils::{HttpFetch, ScanLogger};
