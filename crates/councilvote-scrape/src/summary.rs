//! Item summaries from legislation detail pages.

use std::collections::BTreeMap;

use councilvote_core::FileNumber;
use tracing::{debug, warn};

use crate::page::MeetingPage;

const MAX_SUMMARY_CHARS: usize = 2000;
const MARKED_PARAGRAPHS: usize = 5;
const MARKED_MIN_LEN: usize = 20;
const FALLBACK_PARAGRAPHS: usize = 3;
const FALLBACK_MIN_LEN: usize = 30;

const SECTION_LABELS: &[&str] = &["Department", "Responsible Department", "Title"];
const FALLBACK_LABELS: &[&str] = &["Title", "Report", "Summary", "Department", "Responsible Department"];

/// Condense a detail page's paragraphs into a description.
///
/// Text after a "Report Summary" marker wins; the marker may be one
/// paragraph or split as "Report" then "Summary".
pub fn summarize(paragraphs: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut saw_report = false;
    let mut capture = false;
    for text in paragraphs.iter().map(|p| p.trim()) {
        if text == "Report" {
            saw_report = true;
            continue;
        }
        if saw_report && text == "Summary" {
            capture = true;
            continue;
        }
        if text.contains("Report Summary") {
            capture = true;
            continue;
        }
        if capture && text.chars().count() > MARKED_MIN_LEN && !SECTION_LABELS.contains(&text) {
            parts.push(text);
            if parts.len() >= MARKED_PARAGRAPHS {
                break;
            }
        }
    }

    if parts.is_empty() {
        parts = paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|t| t.chars().count() > FALLBACK_MIN_LEN && !FALLBACK_LABELS.contains(t))
            .take(FALLBACK_PARAGRAPHS)
            .collect();
    }

    parts.join(" ").chars().take(MAX_SUMMARY_CHARS).collect()
}

/// Load a detail page and summarize it. Failures yield an empty string.
pub async fn scrape_item_summary(page: &mut dyn MeetingPage, url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if let Err(e) = page.goto(url).await {
        warn!(url, error = %e, "detail page failed to load");
        return String::new();
    }
    match page.paragraphs().await {
        Ok(paragraphs) => summarize(&paragraphs),
        Err(e) => {
            warn!(url, error = %e, "could not read detail page");
            String::new()
        }
    }
}

/// Summaries for each wanted file number that has a detail URL.
pub async fn collect_summaries<'a>(
    page: &mut dyn MeetingPage,
    detail_urls: &BTreeMap<FileNumber, String>,
    wanted: impl IntoIterator<Item = &'a FileNumber>,
) -> BTreeMap<FileNumber, String> {
    let mut summaries = BTreeMap::new();
    for file_number in wanted {
        if summaries.contains_key(file_number) {
            continue;
        }
        let Some(url) = detail_urls.get(file_number) else {
            continue;
        };
        let summary = scrape_item_summary(page, url).await;
        debug!(file_number = %file_number, chars = summary.len(), "item summary");
        if !summary.is_empty() {
            summaries.insert(file_number.clone(), summary);
        }
    }
    summaries
}
