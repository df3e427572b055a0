use async_trait::async_trait;
use councilvote_core::{AgendaItem, Event, MonthRange, RollCall};

use crate::SourceError;

/// Ordered meetings and agenda items for the council body.
///
/// An upstream "no matches" is an empty vector, never an error; an error
/// means the source could not be reached after retries.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Meetings in `months` of `year`, ascending by date.
    async fn list_events(&self, year: i32, months: MonthRange) -> Result<Vec<Event>, SourceError>;

    /// Agenda items of one meeting, in agenda order.
    async fn list_items(&self, event_id: i64) -> Result<Vec<AgendaItem>, SourceError>;

    /// Recorded roll call for one agenda item.
    async fn list_roll_calls(&self, event_item_id: i64) -> Result<Vec<RollCall>, SourceError>;
}
