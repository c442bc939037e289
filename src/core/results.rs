use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::Result;

/// Unstructured findings returned by a module
pub type Findings = HashMap<String, serde_json::Value>;

/// What one module produced for one target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleOutcome {
    pub module: String,
    pub target: String,
    pub findings: Option<Findings>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl ModuleOutcome {
    pub fn has_findings(&self) -> bool {
        self.findings.as_ref().is_some_and(|f| !f.is_empty())
    }
}

/// Everything a single invocation produced, as written to the report file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub timestamp: DateTime<Utc>,
    pub target: String,
    pub outcomes: Vec<ModuleOutcome>,
}

impl ScanReport {
    pub fn new(target: &str, outcomes: Vec<ModuleOutcome>) -> Self {
        Self {
            timestamp: Utc::now(),
            target: target.to_string(),
            outcomes,
        }
    }

    pub fn modules_with_findings(&self) -> usize {
        self.outcomes.iter().filter(|o| o.has_findings()).count()
    }

    /// Write the report as `<dir>/<label>_<timestamp>.json`, creating `dir`
    pub fn save(&self, dir: &Path, label: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let timestamp = self.timestamp.format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{}.json", label, timestamp));

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;

        Ok(path)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
