pub mod config;
pub mod error;
pub mod results;
pub mod traits;

pub use config::Config;
pub use error::{ReconError, Result};
pub use results::{Findings, ModuleOutcome, ScanReport};
pub use traits::ReconModule;
