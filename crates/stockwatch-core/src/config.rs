//! Configuration types for stockwatch
//!
//! This module defines the configuration of a single watch run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::PlanSet;
use crate::state::DEFAULT_STATE_PATH;

/// Public OVH API endpoint (Canada region)
pub const DEFAULT_API_BASE: &str = "https://ca.api.ovh.com";

/// Plans watched when none are configured
pub const DEFAULT_PLANS: &str = "KS-A=24ska01";

/// Datacenters watched when none are configured
pub const DEFAULT_DATACENTERS: &str = "bhs";

/// Main watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Plans to query, in notification order
    pub plans: PlanSet,

    /// Datacenters to report on; `None` means every datacenter the provider returns
    #[serde(default)]
    pub datacenters: Option<Vec<String>>,

    /// Path to the state file
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Provider API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Webhook URL; only required once a notification has to be sent
    #[serde(default, skip_serializing)]
    pub webhook_url: Option<String>,
}

impl WatchConfig {
    /// Create a configuration for the given plans with defaults elsewhere
    pub fn new(plans: PlanSet) -> Self {
        Self {
            plans,
            datacenters: None,
            state_path: default_state_path(),
            api_base: default_api_base(),
            webhook_url: None,
        }
    }

    /// Restrict the run to these datacenters
    pub fn with_datacenters(mut self, datacenters: Vec<String>) -> Self {
        self.datacenters = Some(datacenters);
        self
    }

    /// Set the state file path
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Set the webhook URL
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.plans.is_empty() {
            return Err(crate::Error::config("No plans configured"));
        }

        for plan in &self.plans {
            if plan.plan_name.trim().is_empty() || plan.plan_code.trim().is_empty() {
                return Err(crate::Error::config(format!(
                    "Plan '{}' has an empty name or code",
                    plan.plan_name
                )));
            }
        }

        if let Some(datacenters) = &self.datacenters {
            if datacenters.is_empty() {
                return Err(crate::Error::config(
                    "Datacenter list cannot be empty; omit it to watch all datacenters",
                ));
            }
            if datacenters.iter().any(|dc| dc.trim().is_empty()) {
                return Err(crate::Error::config("Datacenter ids cannot be empty"));
            }
        }

        if self.state_path.as_os_str().is_empty() {
            return Err(crate::Error::config("State path cannot be empty"));
        }

        if !is_http_url(&self.api_base) {
            return Err(crate::Error::config(format!(
                "API base must use HTTP or HTTPS scheme. Got: {}",
                self.api_base
            )));
        }

        // Never echo the webhook URL, it embeds a token
        if let Some(url) = &self.webhook_url
            && !is_http_url(url)
        {
            return Err(crate::Error::config(
                "Webhook URL must use HTTP or HTTPS scheme",
            ));
        }

        Ok(())
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        let plans = DEFAULT_PLANS.parse().unwrap_or_default();
        Self::new(plans).with_datacenters(parse_datacenters(DEFAULT_DATACENTERS).unwrap_or_default())
    }
}

/// Parse a comma-separated datacenter list
///
/// `"*"` or an empty list means "every datacenter the provider reports",
/// returned as `None`.
pub fn parse_datacenters(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed == "*" {
        return None;
    }

    let datacenters: Vec<String> = trimmed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if datacenters.is_empty() {
        None
    } else {
        Some(datacenters)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_PATH)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
