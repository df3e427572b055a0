//! Records exchanged between the API source, the meeting page extractor,
//! and the reconciler.
//!
//! `Event`, `AgendaItem` and `RollCall` deserialize directly from Legistar
//! Web API JSON. Nulls collapse to empty strings so downstream code never has
//! to distinguish "missing" from "blank" for text fields.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::file_number::FileNumber;
use crate::vote::VoteValue;

/// A council meeting from `/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "EventId")]
    pub id: i64,
    #[serde(rename = "EventDate", default, deserialize_with = "nullable")]
    pub date: String,
    #[serde(rename = "EventBodyName", default, deserialize_with = "nullable")]
    pub body_name: String,
    #[serde(rename = "EventInSiteURL", default, deserialize_with = "nullable")]
    pub site_url: String,
    #[serde(rename = "EventAgendaFile", default, deserialize_with = "nullable")]
    pub agenda_file: String,
    #[serde(rename = "EventMinutesFile", default, deserialize_with = "nullable")]
    pub minutes_file: String,
    #[serde(rename = "EventVideoPath", default, deserialize_with = "nullable")]
    pub video_path: String,
}

impl Event {
    /// Meeting date as `YYYY-MM-DD`; also the chronological sort key.
    pub fn meeting_date(&self) -> String {
        format_date(&self.date)
    }
}

/// An agenda item from `/events/{id}/eventitems`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgendaItem {
    #[serde(rename = "EventItemId", default)]
    pub id: i64,
    #[serde(rename = "EventItemEventId", default)]
    pub event_id: i64,
    #[serde(rename = "EventItemTitle", default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(rename = "EventItemMatterFile", default, deserialize_with = "nullable")]
    pub matter_file: String,
    #[serde(rename = "EventItemMatterType", default, deserialize_with = "nullable")]
    pub matter_type: String,
    #[serde(rename = "EventItemAgendaNumber", default, deserialize_with = "text_or_number")]
    pub agenda_number: String,
    /// Tri-state: `Some(1)`, `Some(0)`, or absent.
    #[serde(rename = "EventItemConsent", default)]
    pub consent: Option<i64>,
    /// Tri-state: `Some(1)`, `Some(0)`, or absent.
    #[serde(rename = "EventItemPassedFlag", default)]
    pub passed: Option<i64>,
    #[serde(rename = "EventItemRollCallFlag", default)]
    pub roll_call_flag: Option<i64>,
    #[serde(rename = "EventItemTally", default, deserialize_with = "text_or_number")]
    pub tally: String,
    #[serde(rename = "EventItemActionName", default, deserialize_with = "nullable")]
    pub action_name: String,
    #[serde(rename = "EventItemActionText", default, deserialize_with = "nullable")]
    pub action_text: String,
    #[serde(rename = "EventItemAgendaNote", default, deserialize_with = "nullable")]
    pub agenda_note: String,
    #[serde(rename = "EventItemMinutesNote", default, deserialize_with = "nullable")]
    pub minutes_note: String,
    #[serde(rename = "EventItemMover", default, deserialize_with = "nullable")]
    pub mover: String,
    #[serde(rename = "EventItemSeconder", default, deserialize_with = "nullable")]
    pub seconder: String,
    #[serde(rename = "EventItemVideo", default, deserialize_with = "text_or_number")]
    pub video: String,
    /// API roll call, attached by the runner when requested. Not part of
    /// the eventitems payload.
    #[serde(skip)]
    pub roll_calls: Vec<RollCall>,
}

impl AgendaItem {
    pub fn is_consent(&self) -> bool {
        self.consent == Some(1)
    }

    pub fn is_passed(&self) -> bool {
        self.passed == Some(1)
    }

    pub fn has_roll_call(&self) -> bool {
        self.roll_call_flag == Some(1)
    }

    /// Correlation key for this item's vote popup.
    pub fn file_number(&self) -> FileNumber {
        FileNumber::for_item(&self.matter_file, &self.title)
    }
}

/// One member's recorded vote from `/eventitems/{id}/rollcalls`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollCall {
    #[serde(rename = "RollCallPersonName", default, deserialize_with = "nullable")]
    pub person_name: String,
    #[serde(rename = "RollCallValueName", default, deserialize_with = "nullable")]
    pub value_name: String,
}

/// Per-person votes for one agenda item.
pub type VoteMap = BTreeMap<String, VoteValue>;

/// Everything the meeting page yields for one event.
///
/// Produced once per event by the extractor and read by the reconciler for
/// every item of that event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingScrapeResult {
    pub agenda_url: String,
    pub minutes_url: String,
    pub results_url: String,
    pub item_votes: BTreeMap<FileNumber, VoteMap>,
    pub absent_members: BTreeSet<String>,
    pub item_detail_urls: BTreeMap<FileNumber, String>,
    /// Detail-page summaries, filled only when summary scraping is enabled.
    #[serde(default)]
    pub item_summaries: BTreeMap<FileNumber, String>,
}

impl MeetingScrapeResult {
    pub fn votes_for(&self, file_number: &FileNumber) -> Option<&VoteMap> {
        if file_number.is_empty() {
            return None;
        }
        self.item_votes.get(file_number)
    }
}

/// Format a Legistar timestamp as `YYYY-MM-DD`.
///
/// Accepts naive (`2024-01-10T00:00:00`), offset (`...Z`, `...+07:00`) and
/// bare-date forms; anything else falls back to its first ten characters.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}

/// District or citywide index named in an item title.
pub fn index_name(title: &str) -> String {
    for district in 1..=8 {
        let label = format!("District {district}");
        if title.contains(&label) {
            return label;
        }
    }
    if title.contains("Citywide") {
        return "Citywide".to_string();
    }
    String::new()
}

/// Render a tri-state API flag as its raw integer, or empty when absent.
pub fn flag_cell(flag: Option<i64>) -> String {
    flag.map(|v| v.to_string()).unwrap_or_default()
}

fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Legistar is inconsistent about whether some fields are strings or numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
