//! The per-meeting extraction state machine: Load, DocumentLinks,
//! IndexRows, PopupLoop, Done.

use std::collections::BTreeMap;
use std::time::Duration;

use councilvote_core::config::DEFAULT_SITE_BASE;
use councilvote_core::url::absolutize;
use councilvote_core::{FileNumber, MeetingScrapeResult, VoteMap, VoteValue};
use tracing::{debug, info, warn};

use crate::page::{ActionControl, Anchor, MeetingPage, TableRow};
use crate::PageError;

/// Marker in an href that identifies a rendered meeting document.
const DOCUMENT_VIEW: &str = "View.ashx";
/// Header row label in vote popups.
const PERSON_NAME_HEADER: &str = "Person Name";
/// Index rows shorter than this are layout rows, not agenda items.
const MIN_INDEX_CELLS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Pause after the meeting page loads.
    pub load_settle: Duration,
    /// Pause before enumerating action controls.
    pub pre_scan_wait: Duration,
    /// Upper bound on waiting for a popup dialog.
    pub dialog_wait: Duration,
    /// Pause after opening a popup.
    pub click_settle: Duration,
    /// Pause after closing a popup.
    pub close_settle: Duration,
    /// Maximum popups read per meeting.
    pub popup_cap: usize,
    pub site_base: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            load_settle: Duration::from_millis(1500),
            pre_scan_wait: Duration::from_secs(2),
            dialog_wait: Duration::from_secs(3),
            click_settle: Duration::from_millis(600),
            close_settle: Duration::from_millis(200),
            popup_cap: 100,
            site_base: DEFAULT_SITE_BASE.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Same limits, no pauses. For drivers that are settled on return.
    pub fn immediate() -> Self {
        Self {
            load_settle: Duration::ZERO,
            pre_scan_wait: Duration::ZERO,
            dialog_wait: Duration::ZERO,
            click_settle: Duration::ZERO,
            close_settle: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_site_base(mut self, site_base: impl Into<String>) -> Self {
        self.site_base = site_base.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeetingExtractor {
    config: ExtractorConfig,
}

impl MeetingExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Scrape one meeting page.
    ///
    /// Returns `None` only when the page cannot be loaded. Every later stage
    /// degrades to partial data: a failed query yields nothing for that
    /// stage and a failed popup leaves that item without votes.
    pub async fn scrape_meeting(
        &self,
        page: &mut dyn MeetingPage,
        url: &str,
    ) -> Option<MeetingScrapeResult> {
        if let Err(e) = page.goto(url).await {
            warn!(url, error = %e, "meeting page failed to load");
            return None;
        }
        pause(self.config.load_settle).await;

        let mut result = MeetingScrapeResult::default();

        let anchors = page.anchors().await.unwrap_or_else(|e| {
            warn!(url, error = %e, "could not read page anchors");
            Vec::new()
        });
        let [agenda, minutes, results] = ["Agenda", "Minutes", "Results"]
            .map(|label| self.absolute(document_link(&anchors, label).map(|a| a.href.as_str())));
        result.agenda_url = agenda;
        result.minutes_url = minutes;
        result.results_url = results;

        let rows = page.table_rows().await.unwrap_or_else(|e| {
            warn!(url, error = %e, "could not read item table");
            Vec::new()
        });
        result.item_detail_urls = index_rows(&rows)
            .into_iter()
            .map(|(file, href)| (file, absolutize(&self.config.site_base, &href)))
            .collect();
        debug!(url, items = result.item_detail_urls.len(), "indexed file numbers");

        pause(self.config.pre_scan_wait).await;
        let controls = page.action_controls().await.unwrap_or_else(|e| {
            warn!(url, error = %e, "could not enumerate action details");
            Vec::new()
        });
        if controls.len() > self.config.popup_cap {
            warn!(
                url,
                found = controls.len(),
                cap = self.config.popup_cap,
                "action detail controls over cap; extra ignored"
            );
        }

        for (i, control) in controls.iter().take(self.config.popup_cap).enumerate() {
            let file_number =
                FileNumber::find_in(&control.row_text).unwrap_or_else(|| FileNumber::synthetic(i));

            let read = self.read_popup(page, control).await;
            self.recover(page).await;

            match read {
                Ok(votes) if votes.is_empty() => {
                    debug!(file_number = %file_number, "popup had no vote rows");
                }
                Ok(votes) => {
                    for (member, vote) in &votes {
                        if vote.is_absent() {
                            result.absent_members.insert(member.clone());
                        } else if !vote.is_recognized() {
                            warn!(file_number = %file_number, member, vote = %vote, "unrecognized vote label");
                        }
                    }
                    result.item_votes.insert(file_number, votes);
                }
                Err(e) => {
                    warn!(file_number = %file_number, index = i, error = %e, "popup extraction failed");
                }
            }
        }

        info!(
            url,
            items_with_votes = result.item_votes.len(),
            absent = result.absent_members.len(),
            "meeting scraped"
        );
        Some(result)
    }

    async fn read_popup(
        &self,
        page: &mut dyn MeetingPage,
        control: &ActionControl,
    ) -> Result<VoteMap, PageError> {
        page.open_popup(control).await?;
        pause(self.config.click_settle).await;
        match page.wait_for_dialog(self.config.dialog_wait).await {
            Ok(true) => {}
            Ok(false) => debug!(index = control.index, "no dialog appeared; reading frames anyway"),
            Err(e) => debug!(index = control.index, error = %e, "dialog wait failed; reading frames anyway"),
        }
        let frames = page.frame_rows().await?;
        Ok(popup_votes(&frames))
    }

    /// Close the popup, falling back to a dismiss signal. Runs after every
    /// popup regardless of how the read went.
    async fn recover(&self, page: &mut dyn MeetingPage) {
        if let Err(e) = page.close_popup().await {
            debug!(error = %e, "close control unavailable; dismissing");
            if let Err(e) = page.dismiss().await {
                warn!(error = %e, "dismiss failed");
            }
        }
        pause(self.config.close_settle).await;
    }

    fn absolute(&self, href: Option<&str>) -> String {
        href.map(|h| absolutize(&self.config.site_base, h))
            .unwrap_or_default()
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

/// First anchor whose text contains `label` (case-insensitive) and whose
/// href points at a rendered document.
pub fn document_link<'a>(anchors: &'a [Anchor], label: &str) -> Option<&'a Anchor> {
    let label = label.to_lowercase();
    anchors
        .iter()
        .find(|a| a.text.to_lowercase().contains(&label) && a.href.contains(DOCUMENT_VIEW))
}

/// File numbers and raw detail hrefs from the meeting's item table.
pub fn index_rows(rows: &[TableRow]) -> BTreeMap<FileNumber, String> {
    let mut urls = BTreeMap::new();
    for row in rows.iter().filter(|r| r.cells.len() >= MIN_INDEX_CELLS) {
        let Some(anchor) = row.cells[0].anchor.as_ref() else {
            continue;
        };
        let Some(file_number) = FileNumber::parse_exact(&anchor.text) else {
            continue;
        };
        if !anchor.href.is_empty() {
            urls.insert(file_number, anchor.href.clone());
        }
    }
    urls
}

/// Person/vote pairs from two-cell rows across all frames.
pub fn popup_votes(frames: &[Vec<TableRow>]) -> VoteMap {
    let mut votes = VoteMap::new();
    for row in frames.iter().flatten() {
        let [name, vote] = row.cells.as_slice() else {
            continue;
        };
        let (name, vote) = (name.text.trim(), vote.text.trim());
        if name.is_empty() || vote.is_empty() || name == PERSON_NAME_HEADER {
            continue;
        }
        votes.insert(name.to_string(), VoteValue::new(vote));
    }
    votes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::TableCell;

    fn index_row(first: TableCell) -> TableRow {
        let mut cells = vec![first];
        cells.extend((0..6).map(|i| TableCell::text(format!("c{i}"))));
        TableRow::new(cells)
    }

    #[test]
    fn document_link_needs_label_and_view_href() {
        let anchors = vec![
            Anchor::new("Agenda packet", "/Calendar.aspx"),
            Anchor::new("AGENDA", "View.ashx?M=A&ID=1"),
            Anchor::new("Minutes", "View.ashx?M=M&ID=1"),
        ];
        assert_eq!(document_link(&anchors, "Agenda").unwrap().href, "View.ashx?M=A&ID=1");
        assert_eq!(document_link(&anchors, "Minutes").unwrap().href, "View.ashx?M=M&ID=1");
        assert!(document_link(&anchors, "Results").is_none());
    }

    #[test]
    fn index_rows_keeps_exact_file_numbers() {
        let rows = vec![
            index_row(TableCell::link("24-0001", "LegislationDetail.aspx?ID=1")),
            index_row(TableCell::link("Item 24-0002", "LegislationDetail.aspx?ID=2")),
            index_row(TableCell::text("24-0003")),
            TableRow::new(vec![TableCell::link("24-0004", "x"); 3]),
            index_row(TableCell::link(" 24-0005 ", "LegislationDetail.aspx?ID=5")),
        ];
        let urls = index_rows(&rows);
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[&FileNumber::from("24-0001")], "LegislationDetail.aspx?ID=1");
        assert!(urls.contains_key(&FileNumber::from("24-0005")));
    }

    #[test]
    fn popup_votes_skip_header_and_blank_cells() {
        let frames = vec![
            vec![TableRow::new(vec![TableCell::text("Meeting details")])],
            vec![
                TableRow::pair("Person Name", "Vote"),
                TableRow::pair("Jim Waring", "Nay"),
                TableRow::pair("Debra Stark", ""),
                TableRow::pair("", "Aye"),
                TableRow::new(vec![TableCell::text("Laura Pastor")]),
                TableRow::pair(" Kate Gallego ", " Aye "),
            ],
        ];
        let votes = popup_votes(&frames);
        assert_eq!(votes.len(), 2);
        assert_eq!(votes["Jim Waring"].as_str(), "Nay");
        assert_eq!(votes["Kate Gallego"].as_str(), "Aye");
        assert!(!votes.contains_key("Person Name"));
    }

    #[test]
    fn default_timings() {
        let c = ExtractorConfig::default();
        assert_eq!(c.popup_cap, 100);
        assert_eq!(c.dialog_wait, Duration::from_secs(3));
        assert_eq!(ExtractorConfig::immediate().load_settle, Duration::ZERO);
    }
}
