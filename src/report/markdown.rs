//! Markdown post-processing for backend report sections.
//!
//! The chat endpoints return loosely formatted markdown. Two fixups are
//! applied before display: the "Missing Information" section is split out so
//! it can render as a separate callout, and inline `**bold**` spans are the
//! only markdown syntax honored (everything else is escaped verbatim).

use regex::Regex;
use std::sync::LazyLock;

static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*([^*]+?)\*\*:?\s*$").unwrap());
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+?)\*\*").unwrap());

/// Split a report body into (main text, optional "Missing Information"
/// section). The section starts at a `## Missing Information` or
/// `**Missing Information**` heading and runs until the next heading.
pub fn split_missing_information(markdown: &str) -> (String, Option<String>) {
    let mut body = Vec::new();
    let mut missing = Vec::new();
    let mut in_missing = false;

    for line in markdown.lines() {
        match heading_title(line) {
            Some(title) if title.to_lowercase().contains("missing information") => {
                in_missing = true;
                continue;
            }
            Some(_) => in_missing = false,
            None => {}
        }
        if in_missing {
            missing.push(line);
        } else {
            body.push(line);
        }
    }

    let missing_text = missing.join("\n").trim().to_string();
    (
        body.join("\n").trim().to_string(),
        if missing_text.is_empty() {
            None
        } else {
            Some(missing_text)
        },
    )
}

fn heading_title(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix('#') {
        return Some(rest.trim_start_matches('#').trim().trim_end_matches(':'));
    }
    BOLD_HEADING
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Render a markdown fragment as safe HTML: everything escaped, `**bold**`
/// converted to `<strong>`, line breaks preserved.
pub fn render_inline_html(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = BOLD_SPAN.replace_all(&escaped, "<strong>$1</strong>");
    bolded.replace('\n', "<br>\n")
}

/// Terminal rendering: strip bold markers, keep the text.
pub fn render_inline_text(text: &str) -> String {
    BOLD_SPAN.replace_all(text, "$1").into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
