//! Vote reconciliation: one API agenda item plus its meeting's scrape result
//! in, one fixed-order row out.
//!
//! # Seat resolution
//!
//! For each seat, in roster order, the first rule that yields a value wins:
//!
//! 1. a person mapped to the seat is in the meeting's absent set → `Absent`
//! 2. a person mapped to the seat has an entry in the item's vote map → that entry
//! 3. the item is a consent item → `Consent`
//! 4. the item passed and has action text → `Voice Vote`
//! 5. otherwise empty
//!
//! The item's vote map is the popup votes recorded under its file number.
//! When the popup recorded nothing and the API roll call was fetched, the
//! roll call stands in.
//!
//! Reconciliation is total: missing data degrades to empty strings, never
//! to an error.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use crate::file_number::FileNumber;
use crate::model::{AgendaItem, Event, MeetingScrapeResult, VoteMap, flag_cell, index_name};
use crate::roster::RosterYear;
use crate::schema::{FIXED_COLUMN_COUNT, MEETING_TYPE, column_index};
use crate::url::{absolutize, prefer_absolute};
use crate::vote::VoteValue;

/// Final record for one agenda item: the fixed columns followed by one vote
/// per roster seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledRow {
    fixed: [String; FIXED_COLUMN_COUNT],
    votes: Vec<VoteValue>,
}

impl ReconciledRow {
    pub fn fixed(&self) -> &[String] {
        &self.fixed
    }

    /// Seat votes in roster order.
    pub fn votes(&self) -> &[VoteValue] {
        &self.votes
    }

    /// Value of a fixed column by name.
    pub fn get(&self, column: &str) -> Option<&str> {
        column_index(column).map(|i| self.fixed[i].as_str())
    }

    pub fn file_number(&self) -> &str {
        &self.fixed[FIXED_COLUMN_COUNT - 2]
    }

    /// Vote recorded for `seat`, looked up through the roster's column order.
    pub fn vote_for<'a>(&'a self, roster: &RosterYear, seat: &str) -> Option<&'a VoteValue> {
        let i = roster.seats().iter().position(|s| s == seat)?;
        self.votes.get(i)
    }

    /// Fixed columns plus one per seat.
    pub fn field_count(&self) -> usize {
        self.fixed.len() + self.votes.len()
    }

    /// Flatten into the output field sequence.
    pub fn into_fields(self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.field_count());
        fields.extend(self.fixed);
        fields.extend(self.votes.into_iter().map(VoteValue::into_string));
        fields
    }
}

/// Reconcile one agenda item against its meeting's scrape result.
///
/// `scrape` is `None` when the meeting page could not be loaded; document
/// URLs then come from the API event and votes only from item-level flags.
/// `site_base` is the origin relative URLs are resolved against.
pub fn reconcile(
    event: &Event,
    item: &AgendaItem,
    roster: &RosterYear,
    scrape: Option<&MeetingScrapeResult>,
    site_base: &str,
) -> ReconciledRow {
    let file_number = item.file_number();
    let empty = MeetingScrapeResult::default();
    let scraped = scrape.unwrap_or(&empty);

    let item_votes = item_vote_map(item, scraped.votes_for(&file_number));
    let votes = roster
        .seats()
        .iter()
        .map(|seat| resolve_seat(roster, seat, item, item_votes.as_deref(), &scraped.absent_members))
        .collect();

    let agenda_url = prefer_absolute(site_base, &scraped.agenda_url, &event.agenda_file);
    let minutes_url = prefer_absolute(site_base, &scraped.minutes_url, &event.minutes_file);
    let results_url = absolutize(site_base, &scraped.results_url);
    let detail_url = lookup(&scraped.item_detail_urls, &file_number)
        .map(|u| absolutize(site_base, u))
        .unwrap_or_default();
    let description = lookup(&scraped.item_summaries, &file_number)
        .cloned()
        .unwrap_or_default();

    let fixed = [
        event.meeting_date(),
        MEETING_TYPE.to_string(),
        event.body_name.clone(),
        event.site_url.clone(),
        agenda_url,
        minutes_url,
        event.video_path.clone(),
        item.matter_type.clone(),
        String::new(),
        item.agenda_number.clone(),
        item.title.clone(),
        description,
        String::new(),
        String::new(),
        flag_cell(item.consent),
        flag_cell(item.passed),
        item.tally.clone(),
        index_name(&item.title),
        item.action_name.clone(),
        item.action_text.clone(),
        item.agenda_note.clone(),
        item.minutes_note.clone(),
        item.mover.clone(),
        item.seconder.clone(),
        String::new(),
        String::new(),
        item.video.clone(),
        results_url,
        file_number.to_string(),
        detail_url,
    ];

    ReconciledRow { fixed, votes }
}

/// Resolve one seat's vote through the fallback chain.
pub fn resolve_seat(
    roster: &RosterYear,
    seat: &str,
    item: &AgendaItem,
    item_votes: Option<&VoteMap>,
    absent: &BTreeSet<String>,
) -> VoteValue {
    if roster.persons_for_seat(seat).any(|p| absent.contains(p)) {
        return VoteValue::absent();
    }
    let recorded = item_votes.and_then(|votes| {
        roster
            .persons_for_seat(seat)
            .filter_map(|p| votes.get(p))
            .find(|v| !v.is_empty())
    });
    if let Some(vote) = recorded {
        return vote.clone();
    }
    if item.is_consent() {
        VoteValue::consent()
    } else if item.is_passed() && !item.action_text.is_empty() {
        VoteValue::voice_vote()
    } else {
        VoteValue::empty()
    }
}

/// Popup votes when present, otherwise the API roll call if one was fetched.
fn item_vote_map<'a>(item: &AgendaItem, popup: Option<&'a VoteMap>) -> Option<Cow<'a, VoteMap>> {
    match popup {
        Some(votes) if !votes.is_empty() => Some(Cow::Borrowed(votes)),
        _ if !item.roll_calls.is_empty() => Some(Cow::Owned(
            item.roll_calls
                .iter()
                .filter(|rc| !rc.person_name.is_empty())
                .map(|rc| (rc.person_name.clone(), VoteValue::new(rc.value_name.clone())))
                .collect(),
        )),
        _ => popup.map(Cow::Borrowed),
    }
}

fn lookup<'a, V>(map: &'a BTreeMap<FileNumber, V>, key: &FileNumber) -> Option<&'a V> {
    if key.is_empty() { None } else { map.get(key) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RollCall;
    use crate::roster::resolve_roster;

    const BASE: &str = "https://phoenix.legistar.com";

    fn event() -> Event {
        Event {
            id: 1,
            date: "2024-01-10T00:00:00".into(),
            body_name: "City Council Formal Meeting".into(),
            site_url: "https://phoenix.legistar.com/MeetingDetail.aspx?ID=1".into(),
            agenda_file: "https://legistar/agenda.pdf".into(),
            minutes_file: "/View.ashx?M=M&ID=1".into(),
            video_path: String::new(),
        }
    }

    fn item(matter_file: &str, title: &str) -> AgendaItem {
        AgendaItem {
            id: 10,
            event_id: 1,
            title: title.into(),
            matter_file: matter_file.into(),
            ..AgendaItem::default()
        }
    }

    fn popup(file: &str, votes: &[(&str, &str)]) -> MeetingScrapeResult {
        let mut scrape = MeetingScrapeResult::default();
        scrape.item_votes.insert(
            FileNumber::from(file),
            votes.iter().map(|&(p, v)| (p.to_string(), VoteValue::from(v))).collect(),
        );
        scrape
    }

    #[test]
    fn popup_vote_lands_in_mapped_seat() {
        let roster = resolve_roster(2024).unwrap();
        let scrape = popup("24-0001", &[("Jim Waring", "Aye")]);
        let row = reconcile(&event(), &item("24-0001", "Contract"), roster, Some(&scrape), BASE);

        assert_eq!(row.vote_for(roster, "Jim Waring (D2)").unwrap().as_str(), "Aye");
        let others = roster.seats().iter().filter(|s| *s != "Jim Waring (D2)");
        for seat in others {
            assert!(row.vote_for(roster, seat).unwrap().is_empty(), "{seat}");
        }
        assert_eq!(row.file_number(), "24-0001");
    }

    #[test]
    fn absence_outranks_popup_vote() {
        let roster = resolve_roster(2024).unwrap();
        let mut scrape = popup("24-0001", &[("Debra Stark", "Aye")]);
        scrape.absent_members.insert("Debra Stark".into());
        let row = reconcile(&event(), &item("24-0001", ""), roster, Some(&scrape), BASE);
        assert_eq!(row.vote_for(roster, "Debra Stark (D3)").unwrap().as_str(), "Absent");
    }

    #[test]
    fn consent_fills_unresolved_seats() {
        let roster = resolve_roster(2024).unwrap();
        let mut it = item("", "Liquor license");
        it.consent = Some(1);
        it.passed = Some(1);
        it.action_text = "approved".into();
        let row = reconcile(&event(), &it, roster, None, BASE);
        assert!(row.votes().iter().all(|v| v.as_str() == "Consent"));
    }

    #[test]
    fn passed_with_action_text_is_voice_vote() {
        let roster = resolve_roster(2024).unwrap();
        let mut it = item("", "Minutes");
        it.consent = Some(0);
        it.passed = Some(1);
        it.action_text = "A motion was made".into();
        let row = reconcile(&event(), &it, roster, None, BASE);
        assert!(row.votes().iter().all(|v| v.as_str() == "Voice Vote"));

        it.action_text.clear();
        let row = reconcile(&event(), &it, roster, None, BASE);
        assert!(row.votes().iter().all(VoteValue::is_empty));
    }

    #[test]
    fn missing_scrape_uses_api_documents() {
        let roster = resolve_roster(2024).unwrap();
        let row = reconcile(&event(), &item("24-0001", ""), roster, None, BASE);
        assert_eq!(row.get("EventAgendaFile"), Some("https://legistar/agenda.pdf"));
        assert_eq!(
            row.get("EventMinutesFile"),
            Some("https://phoenix.legistar.com/View.ashx?M=M&ID=1")
        );
        assert_eq!(row.get("ResultsURL"), Some(""));
        assert_eq!(row.get("FileDetailURL"), Some(""));
    }

    #[test]
    fn scraped_documents_are_preferred_and_absolutized() {
        let roster = resolve_roster(2024).unwrap();
        let mut scrape = MeetingScrapeResult {
            agenda_url: "View.ashx?M=A&ID=1".into(),
            results_url: "/View.ashx?M=E2&ID=1".into(),
            ..MeetingScrapeResult::default()
        };
        scrape
            .item_detail_urls
            .insert("24-0001".into(), "LegislationDetail.aspx?ID=7".into());
        let row = reconcile(&event(), &item("24-0001", ""), roster, Some(&scrape), BASE);
        assert_eq!(
            row.get("EventAgendaFile"),
            Some("https://phoenix.legistar.com/View.ashx?M=A&ID=1")
        );
        assert_eq!(
            row.get("ResultsURL"),
            Some("https://phoenix.legistar.com/View.ashx?M=E2&ID=1")
        );
        assert_eq!(
            row.get("FileDetailURL"),
            Some("https://phoenix.legistar.com/LegislationDetail.aspx?ID=7")
        );
    }

    #[test]
    fn derived_fixed_columns() {
        let roster = resolve_roster(2024).unwrap();
        let mut it = item("", "Rezoning 24-0777 (District 6)");
        it.consent = Some(0);
        it.agenda_number = "42".into();
        let row = reconcile(&event(), &it, roster, None, BASE);
        assert_eq!(row.get("MeetingDate"), Some("2024-01-10"));
        assert_eq!(row.get("MeetingType"), Some("Formal"));
        assert_eq!(row.get("IndexName"), Some("District 6"));
        assert_eq!(row.get("EventItemConsent"), Some("0"));
        assert_eq!(row.get("EventItemPassedFlag"), Some(""));
        assert_eq!(row.get("FileNumber"), Some("24-0777"));
        assert_eq!(row.field_count(), FIXED_COLUMN_COUNT + roster.seats().len());
    }

    #[test]
    fn roll_call_stands_in_when_popup_is_missing() {
        let roster = resolve_roster(2024).unwrap();
        let mut it = item("24-0002", "");
        it.roll_calls = vec![RollCall {
            person_name: "Laura Pastor".into(),
            value_name: "Nay".into(),
        }];
        let row = reconcile(&event(), &it, roster, None, BASE);
        assert_eq!(row.vote_for(roster, "Laura Pastor (D4)").unwrap().as_str(), "Nay");

        let scrape = popup("24-0002", &[("Laura Pastor", "Aye")]);
        let row = reconcile(&event(), &it, roster, Some(&scrape), BASE);
        assert_eq!(row.vote_for(roster, "Laura Pastor (D4)").unwrap().as_str(), "Aye");
    }

    #[test]
    fn synthetic_popup_keys_never_correlate() {
        let roster = resolve_roster(2024).unwrap();
        let scrape = popup("item_3", &[("Jim Waring", "Nay")]);
        let row = reconcile(&event(), &item("", "Call to Order"), roster, Some(&scrape), BASE);
        assert!(row.votes().iter().all(VoteValue::is_empty));
    }

    #[test]
    fn into_fields_appends_votes_in_roster_order() {
        let roster = resolve_roster(2024).unwrap();
        let scrape = popup("24-0001", &[("Kate Gallego", "Aye")]);
        let fields = reconcile(&event(), &item("24-0001", ""), roster, Some(&scrape), BASE)
            .into_fields();
        assert_eq!(fields.len(), 39);
        assert_eq!(fields[30], "Aye");
    }
}
