use crate::core::config::Config;
use crate::core::error::{ReconError, Result};
use crate::core::results::Findings;
use crate::core::traits::ReconModule;
use crate::utils::http::{fetch, CurlHttp, HttpFetch, HttpRequest};
use crate::utils::logger::{ScanLogger, TracingLogger};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const IMPLIED_FIELDS: &str = "Email, Password (Implied)";

#[derive(Debug, Deserialize)]
struct LeakCheckResponse {
    success: Option<bool>,
    sources: Option<Vec<LeakSource>>,
}

#[derive(Debug, Deserialize)]
struct LeakSource {
    name: Option<String>,
    date: Option<String>,
    fields: Option<Vec<String>>,
}

impl LeakSource {
    fn compromised_data(&self) -> String {
        match &self.fields {
            Some(fields) if !fields.is_empty() => fields.join(", "),
            _ => IMPLIED_FIELDS.to_string(),
        }
    }
}

/// Looks a target up in the LeakCheck public breach database
pub struct BreachChecker {
    config: Arc<Config>,
    logger: Arc<dyn ScanLogger>,
    http: Arc<dyn HttpFetch>,
}

impl BreachChecker {
    pub fn new() -> Self {
        Self {
            config: Arc::new(Config::from_env()),
            logger: Arc::new(TracingLogger),
            http: Arc::new(CurlHttp),
        }
    }

    pub fn with_config(mut self, config: Arc<Config>) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ScanLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_http(mut self, http: Arc<dyn HttpFetch>) -> Self {
        self.http = http;
        self
    }

    fn query_url(&self, target: &str) -> String {
        let mut url = format!(
            "{}?check={}",
            self.config.leakcheck_api_url,
            urlencoding::encode(target)
        );
        if let Some(key) = &self.config.leakcheck_api_key {
            url.push_str(&format!("&key={}", urlencoding::encode(key)));
        }
        url
    }

    /// `Ok(None)` means the target is clean
    async fn lookup(&self, target: &str) -> Result<Option<Findings>> {
        let request = HttpRequest::get(self.query_url(target), self.config.timeout())
            .header("Accept", "application/json");

        let response = fetch(Arc::clone(&self.http), request).await?;

        if response.is_success() {
            let body: serde_json::Value = response.json()?;
            let parsed: LeakCheckResponse = serde_json::from_value(body.clone())?;

            if !parsed.success.unwrap_or(false) {
                self.logger
                    .info(&format!("Target {} appears clean (no public hits).", target));
                return Ok(None);
            }

            self.report_sources(parsed.sources.as_deref().unwrap_or_default());

            match body {
                serde_json::Value::Object(map) => Ok(Some(map.into_iter().collect())),
                other => Err(ReconError::MalformedResponse(format!(
                    "expected a JSON object, got {}",
                    other
                ))),
            }
        } else if response.is_rate_limited() {
            Err(ReconError::RateLimited(target.to_string()))
        } else if response.is_not_found() {
            Err(ReconError::NotFound(target.to_string()))
        } else {
            Err(ReconError::UnexpectedStatus(response.status_code))
        }
    }

    fn report_sources(&self, sources: &[LeakSource]) {
        self.logger.info(&format!(
            "  [!] CRITICAL: Found in {} breaches!",
            sources.len()
        ));

        for source in sources {
            let name = source.name.as_deref().unwrap_or("Unknown Source");
            let date = source.date.as_deref().unwrap_or("Unknown Date");

            self.logger.info(&format!("      -> Source: {}", name));
            self.logger.info(&format!("         Date:   {}", date));
            self.logger.info(&format!(
                "         Breached Items: {}",
                source.compromised_data()
            ));
            self.logger.info("         --------------------------------");
        }
    }
}

impl Default for BreachChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReconModule for BreachChecker {
    fn name(&self) -> &str {
        "Breach Checker"
    }

    fn description(&self) -> &str {
        "Checks public databases for compromised emails"
    }

    async fn run(&self, target: &str) -> Option<Findings> {
        if !self.config.has_api_key() {
            self.logger
                .warning("No API Key. Using free tier (Source Name Only, No Passwords).");
        }

        self.logger
            .info(&format!("Scanning breach databases for: {}", target));

        match self.lookup(target).await {
            Ok(findings) => findings,
            Err(ReconError::RateLimited(_)) => {
                self.logger.error("Rate limit hit! Try again later.");
                None
            }
            Err(ReconError::NotFound(_)) => {
                self.logger.info("Target not found in database.");
                None
            }
            Err(ReconError::UnexpectedStatus(status)) => {
                self.logger
                    .warning(&format!("API returned status: {}", status));
                None
            }
            Err(e @ (ReconError::Json(_) | ReconError::MalformedResponse(_))) => {
                self.logger
                    .error(&format!("Unreadable breach API response: {}", e));
                None
            }
            Err(e) => {
                self.logger.error(&format!("Network error: {}", e));
                None
            }
        }
    }
}
