use crate::backend::GraphData;
use crate::ratio::{ExpandState, NormalizedRatios, build_tables, display_label, format_inr, format_value};
use crate::report::{CombinedReport, markdown};
use askama::Template;

#[derive(Template)]
#[template(path = "finlens_report.html")]
struct FinlensReport {
    generated_at: String,
    session_id: String,
    status_line: String,
    has_ratios: bool,
    ratio_tables: Vec<CategoryTableView>,
    extracted_numbers: Vec<LabeledValue>,
    has_graph: bool,
    asset_rows: Vec<LabeledValue>,
    liability_rows: Vec<LabeledValue>,
    metric_rows: Vec<MetricView>,
    sections: Vec<SectionView>,
    director_rows: Vec<DirectorRowView>,
    has_director: bool,
    errors: Vec<ErrorView>,
}

#[allow(dead_code)] // fields used by Askama template
struct CategoryTableView {
    label: String,
    icon: String,
    description: String,
    expanded: bool,
    rows: Vec<RowView>,
}

#[allow(dead_code)] // fields used by Askama template
struct RowView {
    label: String,
    value: String,
    badge: String,
    badge_class: String,
}

#[allow(dead_code)] // fields used by Askama template
struct LabeledValue {
    label: String,
    value: String,
}

#[allow(dead_code)] // fields used by Askama template
struct MetricView {
    name: String,
    year: String,
    value: String,
}

#[allow(dead_code)] // fields used by Askama template
struct SectionView {
    title: String,
    body_html: String,
    missing_html: String,
}

#[allow(dead_code)] // fields used by Askama template
struct DirectorRowView {
    rule: String,
    status: String,
    status_class: String,
    details: String,
}

#[allow(dead_code)] // fields used by Askama template
struct ErrorView {
    section: String,
    message: String,
}

fn badge_class(badge: &str) -> String {
    match badge {
        "Strong" | "Excellent" | "Good" | "Conservative" | "Low Risk" => {
            "bg-green-900/30 text-green-400".into()
        }
        "Adequate" | "Fair" | "Moderate" | "Moderate Risk" | "Tight" => {
            "bg-yellow-900/30 text-yellow-400".into()
        }
        "Weak" | "Aggressive" | "High Risk" => "bg-red-900/30 text-red-400".into(),
        _ => "bg-gray-800 text-gray-400".into(),
    }
}

fn director_status_class(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.starts_with("non") || lower.contains("fail") {
        "text-red-400".into()
    } else if lower.contains("partial") || lower.contains("unclear") {
        "text-yellow-400".into()
    } else {
        "text-green-400".into()
    }
}

fn ratio_views(ratios: &NormalizedRatios) -> Vec<CategoryTableView> {
    build_tables(ratios, &ExpandState::default())
        .into_iter()
        .map(|t| CategoryTableView {
            label: t.label,
            icon: t.icon,
            description: t.description,
            expanded: t.expanded,
            rows: t
                .rows
                .into_iter()
                .map(|r| RowView {
                    badge_class: badge_class(r.badge.as_deref().unwrap_or("")),
                    badge: r.badge.unwrap_or_default(),
                    label: r.label,
                    value: r.value,
                })
                .collect(),
        })
        .collect()
}

fn graph_views(graph: &GraphData) -> (Vec<LabeledValue>, Vec<LabeledValue>, Vec<MetricView>) {
    let amounts = |map: &std::collections::BTreeMap<String, f64>| {
        map.iter()
            .map(|(k, v)| LabeledValue {
                label: k.clone(),
                value: format_inr(*v),
            })
            .collect()
    };
    let metrics = graph
        .ratios
        .iter()
        .flat_map(|(name, years)| {
            let key = name.to_lowercase().replace(' ', "_");
            years.iter().map(move |(year, value)| MetricView {
                name: name.clone(),
                year: year.clone(),
                value: format_value(&key, Some(*value)),
            })
        })
        .collect();
    (
        amounts(&graph.asset_composition),
        amounts(&graph.liability_composition),
        metrics,
    )
}

fn section_view(title: &str, body: &str) -> SectionView {
    let (main, missing) = markdown::split_missing_information(body);
    SectionView {
        title: title.to_string(),
        body_html: markdown::render_inline_html(&main),
        missing_html: missing
            .map(|m| markdown::render_inline_html(&m))
            .unwrap_or_default(),
    }
}

pub fn render_combined_report(report: &CombinedReport) -> anyhow::Result<String> {
    let (ratio_tables, extracted_numbers) = match &report.ratios {
        Some(r) => (
            ratio_views(r),
            r.extracted_numbers
                .iter()
                .map(|(k, v)| LabeledValue {
                    label: display_label(k),
                    value: format_value(k, Some(*v)),
                })
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let has_ratios = !ratio_tables.is_empty();

    let (asset_rows, liability_rows, metric_rows) = match &report.graph {
        Some(g) => graph_views(g),
        None => (Vec::new(), Vec::new(), Vec::new()),
    };
    let has_graph = !asset_rows.is_empty() || !liability_rows.is_empty() || !metric_rows.is_empty();

    let mut sections = Vec::new();
    if let Some(body) = &report.compliance_gap {
        sections.push(section_view("Compliance Gap Report", body));
    }
    if let Some(body) = &report.auditor_report {
        sections.push(section_view("Auditor Report Summary", body));
    }
    if let Some(body) = &report.summary {
        sections.push(section_view("Overall Summary", body));
    }

    let director_rows: Vec<DirectorRowView> = report
        .director_checks
        .iter()
        .flatten()
        .map(|c| DirectorRowView {
            rule: c.rule.clone(),
            status_class: director_status_class(&c.status),
            status: c.status.clone(),
            details: c.details.clone().unwrap_or_default(),
        })
        .collect();
    let has_director = report.director_checks.is_some();

    let page = FinlensReport {
        generated_at: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        session_id: report.session_id.clone(),
        status_line: report.status_line(),
        has_ratios,
        ratio_tables,
        extracted_numbers,
        has_graph,
        asset_rows,
        liability_rows,
        metric_rows,
        sections,
        director_rows,
        has_director,
        errors: report
            .errors
            .iter()
            .map(|e| ErrorView {
                section: e.section.clone(),
                message: e.message.clone(),
            })
            .collect(),
    };

    page.render()
        .map_err(|e| anyhow::anyhow!("template render: {e}"))
}

/// Terminal rendering of the categorized ratio tables.
pub fn render_ratio_text(ratios: &NormalizedRatios) -> String {
    if ratios.is_empty() {
        return "No ratio data available\n".into();
    }
    let mut out = String::new();
    for table in build_tables(ratios, &ExpandState::default()) {
        out.push_str(&format!("{} — {}\n", table.label, table.description));
        for row in &table.rows {
            let badge = row
                .badge
                .as_deref()
                .map(|b| format!("  [{b}]"))
                .unwrap_or_default();
            out.push_str(&format!("  {:<32} {:>14}{badge}\n", row.label, row.value));
        }
        out.push('\n');
    }
    if !ratios.extracted_numbers.is_empty() {
        out.push_str("Extracted Inputs\n");
        for (key, value) in &ratios.extracted_numbers {
            out.push_str(&format!(
                "  {:<32} {:>14}\n",
                display_label(key),
                format_value(key, Some(*value))
            ));
        }
    }
    out
}
