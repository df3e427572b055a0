use councilvote_core::{AgendaItem, Event, MeetingScrapeResult};

/// One meeting's API items and page scrape, tagged with the meeting's
/// position in the API listing.
#[derive(Debug, Clone, Default)]
pub struct MeetingBundle {
    pub index: usize,
    pub event: Event,
    pub items: Vec<AgendaItem>,
    pub scrape: Option<MeetingScrapeResult>,
    /// The meeting had a site URL and the page could not be loaded.
    pub scrape_failed: bool,
}

impl MeetingBundle {
    /// Formatted meeting date, then API position.
    pub fn sort_key(&self) -> (String, usize) {
        (self.event.meeting_date(), self.index)
    }
}

/// Order bundles the way a sequential run emits them.
pub fn sort_bundles(bundles: &mut [MeetingBundle]) {
    bundles.sort_by_cached_key(MeetingBundle::sort_key);
}
