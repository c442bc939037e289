use async_trait::async_trait;

use super::results::Findings;

/// Trait that every reconnaissance module implements.
///
/// `run` never fails: a module logs its own errors and returns `None`, so a
/// caller can drive several modules at once without one failure affecting the
/// others.
#[async_trait]
pub trait ReconModule: Send + Sync {
    /// Display name (e.g., "Breach Checker")
    fn name(&self) -> &str;

    /// Short description of what the module looks for
    fn description(&self) -> &str;

    /// Scan a single target
    async fn run(&self, target: &str) -> Option<Findings>;
}
