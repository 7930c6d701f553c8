//! Terminal rendering of reports and history lists.
//!
//! Reports print in block form: header, executive summary, numbered
//! sections, then sources. Markdown in summaries and section bodies is
//! passed through verbatim.

use crate::models::{HistoryEntry, Report};

/// Format a full report for stdout.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();

    out.push_str("--- Report ---\n");
    out.push_str(&format!("id:      {}\n", report.id));
    out.push_str(&format!("topic:   {}\n", report.topic));
    out.push_str(&format!("created: {}\n", format_created(&report.created_at)));
    out.push('\n');

    out.push_str("--- Executive Summary ---\n");
    out.push_str(&report.summary);
    out.push_str("\n\n");

    out.push_str(&format!("--- Sections ({}) ---\n", report.sections.len()));
    for (i, section) in report.sections.iter().enumerate() {
        out.push_str(&format!("\n[{}] {}\n", i + 1, section.title));
        out.push_str(&section.content);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("--- Sources ({}) ---\n", report.sources.len()));
    for (i, source) in report.sources.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, source.title));
        out.push_str(&format!("    {}\n", source.url));
        if let Some(snippet) = &source.snippet {
            out.push_str(&format!("    {}\n", snippet));
        }
    }

    out
}

/// Format the history listing, newest first as delivered.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No research runs yet. Start one with `deepr new <topic>`.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("--- History ({}) ---\n", entries.len()));
    for entry in entries {
        out.push_str(&format!(
            "{}  {}  {}\n",
            entry.id,
            format_created(&entry.created_at),
            entry.topic
        ));
    }
    out
}

/// Render a backend timestamp for display. The service emits naive UTC
/// ISO-8601 strings; anything unparseable falls through as-is.
fn format_created(raw: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M UTC").to_string();
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format("%Y-%m-%d %H:%M UTC").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, Source};

    fn report_with_sources(sources: Vec<Source>) -> Report {
        Report {
            id: "r1".to_string(),
            topic: "Ocean ecosystems".to_string(),
            summary: "**Key findings** about the ocean.".to_string(),
            sections: vec![Section {
                title: "Introduction".to_string(),
                content: "Some context.".to_string(),
            }],
            sources,
            created_at: "2025-06-01T10:30:00.123456".to_string(),
        }
    }

    #[test]
    fn report_with_no_sources_renders_empty_block() {
        let rendered = render_report(&report_with_sources(vec![]));
        assert!(rendered.contains("--- Sources (0) ---"));
        assert!(rendered.contains("Ocean ecosystems"));
        assert!(rendered.contains("[1] Introduction"));
    }

    #[test]
    fn report_sources_keep_order_and_optional_snippets() {
        let rendered = render_report(&report_with_sources(vec![
            Source {
                title: "First".to_string(),
                url: "https://a.example.com".to_string(),
                snippet: Some("a snippet".to_string()),
            },
            Source {
                title: "Second".to_string(),
                url: "https://b.example.com".to_string(),
                snippet: None,
            },
        ]));
        let first = rendered.find("[1] First").unwrap();
        let second = rendered.find("[2] Second").unwrap();
        assert!(first < second);
        assert!(rendered.contains("a snippet"));
    }

    #[test]
    fn naive_backend_timestamp_is_formatted() {
        assert_eq!(
            format_created("2025-06-01T10:30:00.123456"),
            "2025-06-01 10:30 UTC"
        );
    }

    #[test]
    fn unparseable_timestamp_falls_through() {
        assert_eq!(format_created("yesterday"), "yesterday");
    }

    #[test]
    fn empty_history_suggests_a_first_run() {
        assert!(render_history(&[]).contains("deepr new"));
    }

    #[test]
    fn history_lists_one_line_per_entry() {
        let entries = vec![
            HistoryEntry {
                id: "b".to_string(),
                user_id: 1,
                topic: "Newest".to_string(),
                created_at: "2025-06-02T00:00:00".to_string(),
            },
            HistoryEntry {
                id: "a".to_string(),
                user_id: 1,
                topic: "Older".to_string(),
                created_at: "2025-06-01T00:00:00".to_string(),
            },
        ];
        let rendered = render_history(&entries);
        assert!(rendered.find("Newest").unwrap() < rendered.find("Older").unwrap());
    }
}
