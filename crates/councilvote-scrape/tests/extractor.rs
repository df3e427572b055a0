use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use councilvote_core::FileNumber;
use councilvote_scrape::summary::collect_summaries;
use councilvote_scrape::{
    ActionControl, Anchor, ExtractorConfig, MeetingExtractor, MeetingPage, PageError, TableCell,
    TableRow,
};

const BASE: &str = "https://phoenix.legistar.com";

/// In-memory meeting page. Popups are keyed by control index; a missing
/// entry makes `open_popup` fail.
#[derive(Default)]
struct FakePage {
    unreachable: bool,
    anchors: Vec<Anchor>,
    rows: Vec<TableRow>,
    controls: Vec<ActionControl>,
    popups: HashMap<usize, Vec<TableRow>>,
    details: HashMap<String, Vec<String>>,
    close_broken: bool,
    frames_broken_for: Option<usize>,

    current: String,
    open: Option<usize>,
    opened: usize,
    closed: usize,
    dismissed: usize,
}

#[async_trait]
impl MeetingPage for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), PageError> {
        if self.unreachable {
            return Err(PageError::Navigation {
                url: url.into(),
                reason: "net::ERR_NAME_NOT_RESOLVED".into(),
            });
        }
        self.current = url.to_string();
        Ok(())
    }

    async fn anchors(&mut self) -> Result<Vec<Anchor>, PageError> {
        Ok(self.anchors.clone())
    }

    async fn table_rows(&mut self) -> Result<Vec<TableRow>, PageError> {
        Ok(self.rows.clone())
    }

    async fn action_controls(&mut self) -> Result<Vec<ActionControl>, PageError> {
        Ok(self.controls.clone())
    }

    async fn open_popup(&mut self, control: &ActionControl) -> Result<(), PageError> {
        self.opened += 1;
        if !self.popups.contains_key(&control.index) {
            return Err(PageError::Driver(format!("popup {} detached", control.index)));
        }
        self.open = Some(control.index);
        Ok(())
    }

    async fn wait_for_dialog(&mut self, _timeout: Duration) -> Result<bool, PageError> {
        Ok(self.open.is_some())
    }

    async fn frame_rows(&mut self) -> Result<Vec<Vec<TableRow>>, PageError> {
        if self.open.is_some() && self.open == self.frames_broken_for {
            return Err(PageError::Timeout {
                what: "frame".into(),
                millis: 3000,
            });
        }
        let mut frames = vec![self.rows.clone()];
        if let Some(i) = self.open {
            frames.push(self.popups[&i].clone());
        }
        Ok(frames)
    }

    async fn close_popup(&mut self) -> Result<(), PageError> {
        if self.close_broken || self.open.is_none() {
            return Err(PageError::NoDialog);
        }
        self.open = None;
        self.closed += 1;
        Ok(())
    }

    async fn dismiss(&mut self) -> Result<(), PageError> {
        self.open = None;
        self.dismissed += 1;
        Ok(())
    }

    async fn paragraphs(&mut self) -> Result<Vec<String>, PageError> {
        self.details
            .get(&self.current)
            .cloned()
            .ok_or_else(|| PageError::Driver("no paragraphs".into()))
    }
}

fn extractor() -> MeetingExtractor {
    MeetingExtractor::new(ExtractorConfig::immediate().with_site_base(BASE))
}

fn index_row(file: &str, href: &str) -> TableRow {
    let mut cells = vec![TableCell::link(file, href)];
    cells.extend((0..6).map(|_| TableCell::text("-")));
    TableRow::new(cells)
}

fn control(index: usize, row_text: &str) -> ActionControl {
    ActionControl {
        index,
        row_text: row_text.into(),
        target: format!("HistoryDetail.aspx?ID={index}"),
    }
}

fn popup(votes: &[(&str, &str)]) -> Vec<TableRow> {
    let mut rows = vec![TableRow::pair("Person Name", "Vote")];
    rows.extend(votes.iter().map(|(n, v)| TableRow::pair(n, v)));
    rows
}

#[tokio::test]
async fn unreachable_meeting_yields_none() {
    let mut page = FakePage {
        unreachable: true,
        ..FakePage::default()
    };
    assert!(extractor().scrape_meeting(&mut page, "https://x/MeetingDetail.aspx").await.is_none());
    assert_eq!(page.opened, 0);
}

#[tokio::test]
async fn full_meeting() {
    let mut page = FakePage {
        anchors: vec![
            Anchor::new("Agenda", "/View.ashx?M=A&ID=1"),
            Anchor::new("Minutes", "View.ashx?M=M&ID=1"),
            Anchor::new("Results Summary", "javascript:void(0)"),
        ],
        rows: vec![
            index_row("24-0001", "LegislationDetail.aspx?ID=1"),
            index_row("24-0002", "/LegislationDetail.aspx?ID=2"),
        ],
        controls: vec![
            control(0, "24-0001 1 Ordinance adopted Action details"),
            control(1, "24-0002 1 Resolution adopted Action details"),
            control(2, "Roll call"),
        ],
        popups: HashMap::from([
            (0, popup(&[("Jim Waring", "Nay"), ("Debra Stark", "Absent")])),
            (1, popup(&[("Jim Waring", "Aye"), ("Laura Pastor", "absent")])),
            (2, popup(&[("Kate Gallego", "Present")])),
        ]),
        ..FakePage::default()
    };

    let result = extractor()
        .scrape_meeting(&mut page, "https://phoenix.legistar.com/MeetingDetail.aspx?ID=9")
        .await
        .unwrap();

    assert_eq!(result.agenda_url, "https://phoenix.legistar.com/View.ashx?M=A&ID=1");
    assert_eq!(result.minutes_url, "https://phoenix.legistar.com/View.ashx?M=M&ID=1");
    assert_eq!(result.results_url, "");
    assert_eq!(
        result.item_detail_urls[&FileNumber::from("24-0002")],
        "https://phoenix.legistar.com/LegislationDetail.aspx?ID=2"
    );

    let first = &result.item_votes[&FileNumber::from("24-0001")];
    assert_eq!(first["Jim Waring"].as_str(), "Nay");
    assert!(result.item_votes.contains_key(&FileNumber::from("item_2")));
    let absent: Vec<_> = result.absent_members.iter().map(String::as_str).collect();
    assert_eq!(absent, vec!["Debra Stark", "Laura Pastor"]);
    assert_eq!(page.closed, 3);
    assert_eq!(page.dismissed, 0);
}

#[tokio::test]
async fn one_failing_popup_does_not_stop_the_loop() {
    let total = 105;
    let controls = (0..total).map(|i| control(i, &format!("24-{:04} Action details", i + 1))).collect();
    let popups = (0..total)
        .filter(|&i| i != 36)
        .map(|i| (i, popup(&[("Jim Waring", "Aye")])))
        .collect();
    let mut page = FakePage {
        controls,
        popups,
        ..FakePage::default()
    };

    let result = extractor().scrape_meeting(&mut page, "https://x/m").await.unwrap();

    assert_eq!(result.item_votes.len(), 99);
    assert!(!result.item_votes.contains_key(&FileNumber::from("24-0037")));
    assert!(!result.item_votes.contains_key(&FileNumber::from("24-0101")));
    assert_eq!(page.opened, 100);
    // The failed open leaves nothing to close, so recovery dismisses.
    assert_eq!(page.closed, 99);
    assert_eq!(page.dismissed, 1);
}

#[tokio::test]
async fn recovery_runs_after_extraction_error() {
    let mut page = FakePage {
        controls: vec![control(0, "24-0001"), control(1, "24-0002")],
        popups: HashMap::from([
            (0, popup(&[("Jim Waring", "Aye")])),
            (1, popup(&[("Jim Waring", "Nay")])),
        ]),
        frames_broken_for: Some(0),
        close_broken: true,
        ..FakePage::default()
    };

    let result = extractor().scrape_meeting(&mut page, "https://x/m").await.unwrap();

    assert_eq!(result.item_votes.len(), 1);
    assert_eq!(result.item_votes[&FileNumber::from("24-0002")]["Jim Waring"].as_str(), "Nay");
    assert_eq!(page.dismissed, 2);
    assert!(page.open.is_none());
}

#[tokio::test]
async fn empty_popup_records_nothing() {
    let mut page = FakePage {
        controls: vec![control(0, "24-0001")],
        popups: HashMap::from([(0, popup(&[]))]),
        ..FakePage::default()
    };
    let result = extractor().scrape_meeting(&mut page, "https://x/m").await.unwrap();
    assert!(result.item_votes.is_empty());
    assert!(result.absent_members.is_empty());
}

#[tokio::test]
async fn summaries_for_items_with_detail_urls() {
    let detail = "https://phoenix.legistar.com/LegislationDetail.aspx?ID=1".to_string();
    let mut page = FakePage {
        details: HashMap::from([(
            detail.clone(),
            vec![
                "Report Summary".to_string(),
                "Authorizes a contract for street maintenance.".to_string(),
            ],
        )]),
        ..FakePage::default()
    };
    let urls = [
        (FileNumber::from("24-0001"), detail),
        (FileNumber::from("24-0002"), "https://phoenix.legistar.com/missing".to_string()),
    ]
    .into_iter()
    .collect();
    let wanted = [
        FileNumber::from("24-0001"),
        FileNumber::from("24-0002"),
        FileNumber::from("24-0003"),
    ];

    let summaries = collect_summaries(&mut page, &urls, &wanted).await;

    assert_eq!(summaries.len(), 1);
    assert_eq!(
        summaries[&FileNumber::from("24-0001")],
        "Authorizes a contract for street maintenance."
    );
}
