use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use councilvote_core::{
    AssembledTable, Event, MeetingScrapeResult, MonthRange, RosterYear, assemble, reconcile,
};
use councilvote_legistar::EventSource;
use councilvote_scrape::{MeetingExtractor, SessionFactory};
use tracing::{info, warn};

use crate::{MeetingBundle, ProcessOptions, RunConfig, RunError, run_parallel, run_sequential};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub meetings: usize,
    pub scrape_failures: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn seconds_per_meeting(&self) -> f64 {
        if self.meetings == 0 {
            return 0.0;
        }
        self.elapsed.as_secs_f64() / self.meetings as f64
    }

    pub fn log(&self) {
        info!(
            rows = self.rows,
            meetings = self.meetings,
            scrape_failures = self.scrape_failures,
            elapsed_secs = self.elapsed.as_secs_f64(),
            secs_per_meeting = self.seconds_per_meeting(),
            "run complete"
        );
    }
}

pub struct RunOutput {
    pub table: AssembledTable,
    pub summary: RunSummary,
}

/// Run end to end and return the assembled table.
///
/// The roster is resolved before anything is fetched, so an unsupported
/// year fails without network traffic. A meeting listing that fails after
/// retries aborts the run; every later failure degrades to partial rows.
pub async fn run(
    config: &RunConfig,
    source: Arc<dyn EventSource>,
    factory: Arc<dyn SessionFactory>,
) -> Result<RunOutput, RunError> {
    let started = Instant::now();
    let roster = config.roster()?;

    let events = within_window(
        source.list_events(config.year, config.months).await?,
        config.year,
        config.months,
    );
    info!(
        year = config.year,
        meetings = events.len(),
        workers = config.workers,
        "meetings listed"
    );

    let options = ProcessOptions {
        extractor: MeetingExtractor::new(config.extractor.clone()),
        scrape_summaries: config.scrape_summaries,
        api_roll_calls: config.api_roll_calls,
    };
    let bundles = if config.is_parallel() {
        run_parallel(events, source, factory, &options, config.headless, config.workers).await
    } else {
        run_sequential(events, source.as_ref(), factory.as_ref(), &options, config.headless).await
    };

    for bundle in &bundles {
        let Some(scrape) = &bundle.scrape else { continue };
        let unknown = unknown_voters(scrape, &roster);
        if !unknown.is_empty() {
            warn!(event_id = bundle.event.id, ?unknown, "voters not on the roster");
        }
    }
    let table = reconcile_bundles(&bundles, &roster, &config.site.site_base);

    let summary = RunSummary {
        rows: table.records.len(),
        meetings: bundles.len(),
        scrape_failures: bundles.iter().filter(|b| b.scrape_failed).count(),
        elapsed: started.elapsed(),
    };
    Ok(RunOutput { table, summary })
}

/// Drop meetings dated outside the requested months. Undated meetings are kept.
fn within_window(events: Vec<Event>, year: i32, months: MonthRange) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| {
            let date = event.meeting_date();
            let keep = date.is_empty() || months.contains(year, &date);
            if !keep {
                warn!(event_id = event.id, date = %date, "meeting outside requested months, skipped");
            }
            keep
        })
        .collect()
}

/// Popup voters with no seat on the roster; their votes fill no column.
fn unknown_voters<'a>(scrape: &'a MeetingScrapeResult, roster: &RosterYear) -> BTreeSet<&'a str> {
    scrape
        .item_votes
        .values()
        .flat_map(|votes| votes.keys())
        .chain(scrape.absent_members.iter())
        .map(String::as_str)
        .filter(|person| roster.seat_for(person).is_none())
        .collect()
}

/// One row per agenda item, in bundle order.
pub fn reconcile_bundles(
    bundles: &[MeetingBundle],
    roster: &RosterYear,
    site_base: &str,
) -> AssembledTable {
    let rows = bundles.iter().flat_map(|bundle| {
        bundle
            .items
            .iter()
            .map(|item| reconcile(&bundle.event, item, roster, bundle.scrape.as_ref(), site_base))
    });
    assemble(rows, roster)
}
