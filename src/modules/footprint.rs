use crate::core::results::Findings;
use crate::core::traits::ReconModule;
use crate::utils::http::{fetch, CurlHttp, HttpFetch, HttpRequest, DESKTOP_USER_AGENT};
use crate::utils::logger::{ScanLogger, TracingLogger};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    /// UPI-style handle: local part, then an alphabetic-only provider label
    static ref UPI_PATTERN: Regex = Regex::new(r"^[a-zA-Z0-9.\-_]+@[a-zA-Z]+$").unwrap();
}

const SOCIAL_TIMEOUT: Duration = Duration::from_secs(5);
const DORK_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Platforms that can only be checked by hand
const WALLED_GARDENS: &[&str] = &["LinkedIn", "Facebook", "Instagram"];

/// Validates UPI handles, checks social platforms and prints search dorks
pub struct FootprintTracker {
    upi_handles: HashMap<&'static str, &'static str>,
    /// Checked in order; a 404 from any of them falls back to a dork
    active_sites: Vec<(&'static str, &'static str)>,
    dork_templates: HashMap<&'static str, &'static str>,
    logger: Arc<dyn ScanLogger>,
    http: Arc<dyn HttpFetch>,
}

impl FootprintTracker {
    pub fn new() -> Self {
        let upi_handles = HashMap::from([
            ("okaxis", "Google Pay (Axis)"),
            ("oksbi", "Google Pay (SBI)"),
            ("okicici", "Google Pay (ICICI)"),
            ("ybl", "PhonePe"),
            ("paytm", "Paytm"),
        ]);

        let active_sites = vec![
            ("GitHub", "https://api.github.com/users/{}"),
            ("Reddit", "https://www.reddit.com/user/{}/about.json"),
        ];

        let dork_templates = HashMap::from([
            ("LinkedIn", "linkedin.com/in/{}"),
            ("Facebook", "facebook.com/{}"),
            ("Instagram", "instagram.com/{}"),
            ("GitHub", "github.com/{}"),
            ("Reddit", "reddit.com/user/{}"),
        ]);

        Self {
            upi_handles,
            active_sites,
            dork_templates,
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

    /// Payment provider for a UPI id, or `None` if the id is not UPI-shaped
    pub fn upi_provider(&self, upi_id: &str) -> Option<&'static str> {
        if !UPI_PATTERN.is_match(upi_id) {
            return None;
        }

        let handle = upi_id.rsplit('@').next().unwrap_or_default().to_lowercase();
        Some(
            self.upi_handles
                .get(handle.as_str())
                .copied()
                .unwrap_or("Unknown Provider"),
        )
    }

    /// Google search link for a site's profile page, if the site has a template
    pub fn dork_link(&self, site: &str, username: &str) -> Option<String> {
        self.dork_templates
            .get(site)
            .map(|template| {
                let profile = template.replace("{}", &urlencoding::encode(username));
                format!("{}{}", DORK_SEARCH_URL, profile)
            })
    }

    fn analyze_upi(&self, target: &str) {
        if let Some(provider) = self.upi_provider(target) {
            self.logger
                .info(&format!("  [+] Valid UPI Handle: {}", provider));
        }
    }

    async fn check_socials(&self, username: &str) {
        for (site, template) in &self.active_sites {
            let url = template.replace("{}", &urlencoding::encode(username));
            let request = HttpRequest::get(url.clone(), SOCIAL_TIMEOUT)
                .header("User-Agent", DESKTOP_USER_AGENT);

            // One platform failing must not stop the rest.
            match fetch(Arc::clone(&self.http), request).await {
                Ok(response) if response.is_success() => {
                    self.logger
                        .info(&format!("  [!] FOUND: {} Profile -> {}", site, url));
                }
                Ok(response) if response.is_not_found() => {
                    self.logger.warning(&format!(
                        "  [-] {} API said 404. Generating Fallback Dork...",
                        site
                    ));
                    self.print_dork(site, username);
                }
                Ok(response) => {
                    self.logger.debug(&format!(
                        "{} returned HTTP {}, skipping",
                        site, response.status_code
                    ));
                }
                Err(e) => {
                    self.logger.debug(&format!("{} check failed: {}", site, e));
                }
            }
        }
    }

    fn print_dork(&self, site: &str, username: &str) {
        if let Some(link) = self.dork_link(site, username) {
            self.logger
                .info(&format!("  [>] Manual Check {}: {}", site, link));
        }
    }
}

impl Default for FootprintTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything before the first `@`, or the whole target
fn username_of(target: &str) -> &str {
    target.split('@').next().unwrap_or(target)
}

#[async_trait]
impl ReconModule for FootprintTracker {
    fn name(&self) -> &str {
        "Footprint Tracker"
    }

    fn description(&self) -> &str {
        "Validates UPI, Checks Socials, and Generates Dorks"
    }

    async fn run(&self, target: &str) -> Option<Findings> {
        self.logger
            .info(&format!("Analyzing footprint for: {}", target));

        let username = username_of(target);
        if target.contains('@') {
            self.analyze_upi(target);
        }

        self.logger.info(&format!(
            "  [?] Phase 1: Active Scanning for '{}'...",
            username
        ));
        self.check_socials(username).await;

        self.logger
            .info("  [?] Phase 2: Generating Google Dorks (Walled Gardens)...");
        for site in WALLED_GARDENS {
            self.print_dork(site, username);
        }

        None
    }
}
