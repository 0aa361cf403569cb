//! Company profile data for peer comparison.
//!
//! Pass-through display: the profile endpoint's JSON is shown structurally
//! as-is, no normalization beyond typed deserialization.

use crate::ratio::format_inr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company: CompanyInfo,
    #[serde(default)]
    pub financials: Vec<YearFinancials>,
    #[serde(default)]
    pub directors: Vec<Director>,
    #[serde(default)]
    pub charges: Vec<Charge>,
    #[serde(default, rename = "riskFlags")]
    pub risk_flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default, rename = "incorporationYear")]
    pub incorporation_year: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearFinancials {
    pub year: u32,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    pub name: String,
    #[serde(default)]
    pub designation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    #[serde(default)]
    pub charge_id: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl CompanyProfile {
    /// Most recent reported year, by year number.
    pub fn latest_financials(&self) -> Option<&YearFinancials> {
        self.financials.iter().max_by_key(|f| f.year)
    }

    pub fn net_margin(&self) -> Option<f64> {
        let latest = self.latest_financials()?;
        let revenue = latest.revenue.filter(|r| *r != 0.0)?;
        Some(latest.profit? / revenue)
    }

    pub fn outstanding_charges(&self) -> usize {
        self.charges
            .iter()
            .filter(|c| c.status.as_deref() == Some("Outstanding"))
            .count()
    }
}

/// Terminal peer-comparison table for one or more profiles.
pub fn comparison_lines(profiles: &[(String, CompanyProfile)]) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<24} {:>6} {:>16} {:>16} {:>9} {:>8}",
        "Company", "Year", "Revenue", "Profit", "Margin", "Charges"
    ));
    for (cin, profile) in profiles {
        let latest = profile.latest_financials();
        let year = latest.map(|f| f.year.to_string()).unwrap_or_else(|| "-".into());
        let revenue = latest
            .and_then(|f| f.revenue)
            .map(format_inr)
            .unwrap_or_else(|| "N/A".into());
        let profit = latest
            .and_then(|f| f.profit)
            .map(format_inr)
            .unwrap_or_else(|| "N/A".into());
        let margin = profile
            .net_margin()
            .map(|m| format!("{:.2}%", m * 100.0))
            .unwrap_or_else(|| "N/A".into());
        lines.push(format!(
            "{:<24} {:>6} {:>16} {:>16} {:>9} {:>8}",
            truncate(&profile.company.name, 24),
            year,
            revenue,
            profit,
            margin,
            profile.outstanding_charges()
        ));
        if !profile.risk_flags.is_empty() {
            lines.push(format!("  [{cin}] risk: {}", profile.risk_flags.join("; ")));
        }
    }
    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
