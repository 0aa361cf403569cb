//! Combined-report assembly: concurrent fan-out to the analysis endpoints
//! with per-section failure isolation.
//!
//! Each section succeeds or fails on its own; a failed section contributes an
//! error entry instead of a body, and the run is reported as "succeeded with
//! N failures" rather than failing outright. Dropping the in-flight fetch
//! future aborts every outstanding request (JoinSet abort-on-drop), which
//! ties request lifetime to the caller's.

pub mod markdown;

use crate::backend::{BackendClient, DirectorCheck, GraphData};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::ratio::{NormalizedRatios, normalize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Ratios,
    Graph,
    ComplianceGap,
    AuditorReport,
    DirectorReport,
    Summary,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ratios => "financial ratios",
            Self::Graph => "ratio graphs",
            Self::ComplianceGap => "compliance gap report",
            Self::AuditorReport => "auditor report summary",
            Self::DirectorReport => "director report checks",
            Self::Summary => "overall summary",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionError {
    pub section: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedReport {
    pub session_id: String,
    pub generated_at: DateTime<Utc>,
    pub ratios: Option<NormalizedRatios>,
    pub graph: Option<GraphData>,
    pub compliance_gap: Option<String>,
    pub auditor_report: Option<String>,
    pub director_checks: Option<Vec<DirectorCheck>>,
    pub summary: Option<String>,
    pub errors: Vec<SectionError>,
    pub sections_attempted: usize,
}

impl CombinedReport {
    pub fn sections_succeeded(&self) -> usize {
        self.sections_attempted - self.errors.len()
    }

    pub fn status_line(&self) -> String {
        if self.errors.is_empty() {
            format!("all {} sections succeeded", self.sections_attempted)
        } else {
            format!(
                "succeeded with {} failure{} ({} of {} sections)",
                self.errors.len(),
                if self.errors.len() == 1 { "" } else { "s" },
                self.sections_succeeded(),
                self.sections_attempted
            )
        }
    }
}

enum SectionBody {
    Ratios(NormalizedRatios),
    Graph(GraphData),
    Markdown(Section, String),
    Director(Vec<DirectorCheck>),
}

/// Fetch every enabled section concurrently. The session id is shared
/// read-only across calls; results are folded in as they complete.
pub async fn fetch_combined(
    client: &BackendClient,
    config: &ReportConfig,
    session_id: &str,
) -> CombinedReport {
    let mut set: JoinSet<(Section, Result<SectionBody>)> = JoinSet::new();

    spawn_section(&mut set, client, session_id, Section::Ratios);
    if config.graph {
        spawn_section(&mut set, client, session_id, Section::Graph);
    }
    if config.compliance_gap {
        spawn_section(&mut set, client, session_id, Section::ComplianceGap);
    }
    if config.auditor_report {
        spawn_section(&mut set, client, session_id, Section::AuditorReport);
    }
    if config.director_report {
        spawn_section(&mut set, client, session_id, Section::DirectorReport);
    }
    if config.summary {
        spawn_section(&mut set, client, session_id, Section::Summary);
    }

    let mut report = CombinedReport {
        session_id: session_id.to_string(),
        generated_at: Utc::now(),
        sections_attempted: set.len(),
        ..CombinedReport::default()
    };

    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((section, Ok(body))) => {
                info!(section = section.name(), "section fetched");
                match body {
                    SectionBody::Ratios(r) => report.ratios = Some(r),
                    SectionBody::Graph(g) => report.graph = Some(g),
                    SectionBody::Markdown(Section::ComplianceGap, text) => {
                        report.compliance_gap = Some(text)
                    }
                    SectionBody::Markdown(Section::AuditorReport, text) => {
                        report.auditor_report = Some(text)
                    }
                    SectionBody::Markdown(_, text) => report.summary = Some(text),
                    SectionBody::Director(checks) => report.director_checks = Some(checks),
                }
            }
            Ok((section, Err(e))) => {
                warn!(section = section.name(), error = %e, "section failed");
                report.errors.push(SectionError {
                    section: section.name().to_string(),
                    message: e.to_string(),
                });
            }
            Err(join_err) => {
                warn!(error = %join_err, "section task aborted");
                report.errors.push(SectionError {
                    section: "internal".to_string(),
                    message: format!("task aborted: {join_err}"),
                });
            }
        }
    }

    info!(session = %session_id, "{}", report.status_line());
    report
}

fn spawn_section(
    set: &mut JoinSet<(Section, Result<SectionBody>)>,
    client: &BackendClient,
    session_id: &str,
    section: Section,
) {
    let client = client.clone();
    let session = session_id.to_string();
    set.spawn(async move {
        let result = match section {
            Section::Ratios => client
                .financial_ratios(&session)
                .await
                .map(|raw| SectionBody::Ratios(normalize(&raw))),
            Section::Graph => client.ratios_graph(&session).await.map(SectionBody::Graph),
            Section::ComplianceGap => client
                .compliance_gap(&session)
                .await
                .map(|t| SectionBody::Markdown(section, t)),
            Section::AuditorReport => client
                .auditor_report(&session)
                .await
                .map(|t| SectionBody::Markdown(section, t)),
            Section::DirectorReport => client
                .director_report(&session)
                .await
                .map(SectionBody::Director),
            Section::Summary => client
                .overall_summary(&session)
                .await
                .map(|t| SectionBody::Markdown(section, t)),
        };
        (section, result)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_reports_partial_success() {
        let mut report = CombinedReport {
            sections_attempted: 6,
            ..CombinedReport::default()
        };
        assert_eq!(report.status_line(), "all 6 sections succeeded");

        report.errors.push(SectionError {
            section: Section::Graph.name().into(),
            message: "timed out".into(),
        });
        report.errors.push(SectionError {
            section: Section::Summary.name().into(),
            message: "HTTP 500".into(),
        });
        assert_eq!(
            report.status_line(),
            "succeeded with 2 failures (4 of 6 sections)"
        );
        assert_eq!(report.sections_succeeded(), 4);
    }

    #[test]
    fn section_names_are_stable() {
        assert_eq!(Section::Ratios.name(), "financial ratios");
        assert_eq!(Section::DirectorReport.name(), "director report checks");
    }
}
