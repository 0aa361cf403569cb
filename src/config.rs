use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the analysis backend. The deployments this client talks to
    /// historically hardcoded `http://127.0.0.1:5002` or
    /// `https://finbizinfo.com/api`; here it is a single configurable value.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Which sections the combined report fetches. All enabled by default; a
/// disabled section is simply never requested.
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub graph: bool,
    #[serde(default = "default_true")]
    pub compliance_gap: bool,
    #[serde(default = "default_true")]
    pub auditor_report: bool,
    #[serde(default = "default_true")]
    pub director_report: bool,
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            graph: true,
            compliance_gap: true,
            auditor_report: true,
            director_report: true,
            summary: true,
        }
    }
}

fn default_base_url() -> String {
    std::env::var("FINLENS_BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:5002".into())
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    3
}
fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config {}: {e}", path.display())))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse config: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.is_empty() {
            return Err(Error::config(
                "backend.base_url is empty. Set it in config.toml or export FINLENS_BACKEND_URL",
            ));
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(Error::config(format!(
                "backend.base_url must be an http(s) URL, got {}",
                self.backend.base_url
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::config("backend.timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let toml = r#"
[backend]
base_url = "https://finbizinfo.com/api"
timeout_secs = 30
max_retries = 2

[report]
graph = false
director_report = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.base_url, "https://finbizinfo.com/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.backend.max_retries, 2);
        assert!(!config.report.graph);
        assert!(!config.report.director_report);
        assert!(config.report.summary);
        config.validate().unwrap();
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.backend.base_url.is_empty());
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.backend.max_retries, 3);
        assert!(config.report.compliance_gap);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut config = Config::default();
        config.backend.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
