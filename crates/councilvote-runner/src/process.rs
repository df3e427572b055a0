use councilvote_core::{AgendaItem, Event, FileNumber};
use councilvote_legistar::EventSource;
use councilvote_scrape::summary::collect_summaries;
use councilvote_scrape::{MeetingExtractor, MeetingPage};
use tracing::{debug, info, warn};

use crate::MeetingBundle;

/// Per-meeting knobs, copied into every worker.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub extractor: MeetingExtractor,
    pub scrape_summaries: bool,
    pub api_roll_calls: bool,
}

/// Scrape one meeting page and fetch its agenda items.
///
/// Never fails: an unloadable page leaves `scrape` empty and an item
/// listing that fails after retries is logged and treated as no items.
/// `page` is `None` when the worker could not open a session.
pub async fn process_event(
    index: usize,
    event: Event,
    source: &dyn EventSource,
    page: Option<&mut dyn MeetingPage>,
    options: &ProcessOptions,
) -> MeetingBundle {
    let date = event.meeting_date();
    info!(event_id = event.id, date = %date, "processing meeting");

    let mut scrape = None;
    let mut scrape_failed = false;
    let mut page = page;
    if !event.site_url.is_empty() {
        if let Some(page) = page.as_deref_mut() {
            scrape = options.extractor.scrape_meeting(page, &event.site_url).await;
        }
        scrape_failed = scrape.is_none();
    }

    let mut items = match source.list_items(event.id).await {
        Ok(items) => items,
        Err(e) => {
            warn!(event_id = event.id, error = %e, "agenda items unavailable; meeting has no rows");
            Vec::new()
        }
    };

    if options.api_roll_calls {
        attach_roll_calls(source, &mut items).await;
    }

    if options.scrape_summaries {
        if let (Some(result), Some(page)) = (scrape.as_mut(), page.as_deref_mut()) {
            let wanted: Vec<FileNumber> = items.iter().map(AgendaItem::file_number).collect();
            result.item_summaries =
                collect_summaries(page, &result.item_detail_urls, wanted.iter()).await;
        }
    }

    debug!(event_id = event.id, items = items.len(), "meeting processed");
    MeetingBundle {
        index,
        event,
        items,
        scrape,
        scrape_failed,
    }
}

async fn attach_roll_calls(source: &dyn EventSource, items: &mut [AgendaItem]) {
    for item in items.iter_mut().filter(|i| i.has_roll_call()) {
        match source.list_roll_calls(item.id).await {
            Ok(calls) => item.roll_calls = calls,
            Err(e) => warn!(event_item_id = item.id, error = %e, "roll call unavailable"),
        }
    }
}
