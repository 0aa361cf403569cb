//! Typed client for the financial-analysis backend.
//!
//! Every endpoint takes the opaque `session_id` returned by the upload flow
//! and responds with JSON (or JSONL for the director report). The ratio
//! payload is returned raw; unpicking its shape is the normalizer's job.

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::profile::CompanyProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct BackendClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    session_id: &'a str,
}

/// `{response: ...}` wrapper used by the chat report endpoints.
#[derive(Deserialize)]
struct ChatEnvelope {
    response: Value,
}

/// Chart payload from `/api/ai-ratios-graph`: composition maps plus per-metric
/// year series (`metric → {"Current Year": value}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub asset_composition: BTreeMap<String, f64>,
    #[serde(default)]
    pub liability_composition: BTreeMap<String, f64>,
    #[serde(default)]
    pub ratios: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub expenses: BTreeMap<String, f64>,
}

/// One line of the director-report compliance stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorCheck {
    pub rule: String,
    pub status: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = HttpClient::new(
            "finlens/0.1",
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Raw ratio payload from `/chat/financial-ratio`. Envelopes and shape
    /// variants are left intact for `ratio::normalize`.
    pub async fn financial_ratios(&self, session_id: &str) -> Result<Value> {
        self.http
            .post_json(
                &self.url("/chat/financial-ratio"),
                &SessionRequest { session_id },
            )
            .await
    }

    pub async fn ratios_graph(&self, session_id: &str) -> Result<GraphData> {
        self.http
            .post_json(
                &self.url("/api/ai-ratios-graph"),
                &SessionRequest { session_id },
            )
            .await
    }

    pub async fn compliance_gap(&self, session_id: &str) -> Result<String> {
        self.chat_report("/chat/compliance-gap", session_id).await
    }

    pub async fn auditor_report(&self, session_id: &str) -> Result<String> {
        self.chat_report("/chat/auditor-report", session_id).await
    }

    pub async fn overall_summary(&self, session_id: &str) -> Result<String> {
        self.chat_report("/chat/summary", session_id).await
    }

    /// Director-report compliance checks, streamed by the backend as JSONL.
    /// Unparseable lines are skipped; an `{error}` line fails the section.
    pub async fn director_report(&self, session_id: &str) -> Result<Vec<DirectorCheck>> {
        let body = self
            .http
            .post_json_text(
                &self.url("/chat/director-report"),
                &SessionRequest { session_id },
            )
            .await?;
        parse_director_stream(&body)
    }

    pub async fn company_profile(&self, cin: &str) -> Result<CompanyProfile> {
        self.http
            .get_json(&self.url(&format!("/api/company/profile/{cin}")))
            .await
    }

    async fn chat_report(&self, path: &str, session_id: &str) -> Result<String> {
        let envelope: ChatEnvelope = self
            .http
            .post_json(&self.url(path), &SessionRequest { session_id })
            .await?;
        response_text(path, &envelope.response)
    }
}

/// The chat endpoints respond with a markdown string, but some backend
/// revisions wrap it one level deeper. Accept both.
fn response_text(endpoint: &str, response: &Value) -> Result<String> {
    match response {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => map
            .values()
            .find_map(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::api(endpoint, "response contained no text")),
        _ => Err(Error::api(endpoint, "unexpected response shape")),
    }
}

fn parse_director_stream(body: &str) -> Result<Vec<DirectorCheck>> {
    let mut checks = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping malformed director-report line");
                continue;
            }
        };
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Err(Error::api("/chat/director-report", error));
        }
        match serde_json::from_value::<DirectorCheck>(value) {
            Ok(check) => checks.push(check),
            Err(e) => debug!(error = %e, "director-report line missing rule/status, skipped"),
        }
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn director_stream_parses_line_per_check() {
        let body = "\
{\"rule\": \"Board composition disclosed\", \"status\": \"Compliant\"}\n\
{\"rule\": \"CSR spend reported\", \"status\": \"Non-compliant\", \"details\": \"Section 135 missing\"}\n";
        let checks = parse_director_stream(body).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].rule, "Board composition disclosed");
        assert_eq!(checks[1].details.as_deref(), Some("Section 135 missing"));
    }

    #[test]
    fn director_stream_skips_garbage_lines() {
        let body = "not json\n{\"rule\": \"R1\", \"status\": \"ok\"}\n\n{\"noise\": 1}\n";
        let checks = parse_director_stream(body).unwrap();
        assert_eq!(checks.len(), 1);
    }

    #[test]
    fn director_stream_error_line_fails_section() {
        let body = "{\"rule\": \"R1\", \"status\": \"ok\"}\n{\"error\": \"analyzer unavailable\"}\n";
        let err = parse_director_stream(body).unwrap_err();
        assert!(err.to_string().contains("analyzer unavailable"));
    }

    #[test]
    fn response_text_accepts_string_and_wrapped() {
        assert_eq!(
            response_text("/chat/summary", &json!("## Summary")).unwrap(),
            "## Summary"
        );
        assert_eq!(
            response_text("/chat/summary", &json!({"text": "wrapped"})).unwrap(),
            "wrapped"
        );
        assert!(response_text("/chat/summary", &json!(42)).is_err());
    }

    #[test]
    fn graph_data_deserializes_partial_payloads() {
        let g: GraphData = serde_json::from_value(json!({
            "asset_composition": {"Current Assets": 3432.37},
            "ratios": {"Current Ratio": {"Current Year": 1.19}}
        }))
        .unwrap();
        assert_eq!(g.asset_composition["Current Assets"], 3432.37);
        assert_eq!(g.ratios["Current Ratio"]["Current Year"], 1.19);
        assert!(g.expenses.is_empty());
    }
}
