pub mod breach;
pub mod footprint;
pub mod metadata;

pub use breach::BreachChecker;
pub use footprint::FootprintTracker;
pub use metadata::MetadataExtractor;

use crate::core::config::Config;
use crate::core::results::ModuleOutcome;
use crate::core::traits::ReconModule;
use crate::utils::http::{CurlHttp, HttpFetch};
use crate::utils::logger::{ScanLogger, TracingLogger};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

/// Registry keys, in the order `all_modules` returns them
pub const MODULE_NAMES: &[&str] = &["breach", "footprint", "metadata"];

/// Collaborators handed to every module the registry builds
#[derive(Clone)]
pub struct ModuleContext {
    pub config: Arc<Config>,
    pub logger: Arc<dyn ScanLogger>,
    pub http: Arc<dyn HttpFetch>,
}

impl ModuleContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            logger: Arc::new(TracingLogger),
            http: Arc::new(CurlHttp),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ScanLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_http(mut self, http: Arc<dyn HttpFetch>) -> Self {
        self.http = http;
        self
    }
}

impl Default for ModuleContext {
    fn default() -> Self {
        Self::new(Config::load())
    }
}

/// Get all available modules, keyed by registry name
pub fn all_modules(ctx: &ModuleContext) -> Vec<(&'static str, Box<dyn ReconModule>)> {
    MODULE_NAMES
        .iter()
        .filter_map(|name| get_module(name, ctx).map(|module| (*name, module)))
        .collect()
}

/// Get a module by name or alias
pub fn get_module(name: &str, ctx: &ModuleContext) -> Option<Box<dyn ReconModule>> {
    match name.to_lowercase().as_str() {
        "breach" | "leak" | "leakcheck" => Some(Box::new(
            BreachChecker::new()
                .with_config(Arc::clone(&ctx.config))
                .with_logger(Arc::clone(&ctx.logger))
                .with_http(Arc::clone(&ctx.http)),
        )),
        "footprint" | "social" | "upi" => Some(Box::new(
            FootprintTracker::new()
                .with_logger(Arc::clone(&ctx.logger))
                .with_http(Arc::clone(&ctx.http)),
        )),
        "metadata" | "meta" | "exif" => Some(Box::new(
            MetadataExtractor::new().with_logger(Arc::clone(&ctx.logger)),
        )),
        _ => None,
    }
}

/// Run one module and time it
pub async fn run_module(module: &dyn ReconModule, target: &str) -> ModuleOutcome {
    let start = Instant::now();
    let findings = module.run(target).await;

    ModuleOutcome {
        module: module.name().to_string(),
        target: target.to_string(),
        findings,
        elapsed: start.elapsed(),
    }
}

/// Drive several modules against the same target on the current task.
///
/// Completion order across modules is unspecified; outcomes come back in the
/// order the modules were given.
pub async fn run_all(modules: &[Box<dyn ReconModule>], target: &str) -> Vec<ModuleOutcome> {
    join_all(modules.iter().map(|module| run_module(module.as_ref(), target))).await
}
