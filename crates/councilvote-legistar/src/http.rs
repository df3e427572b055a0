//! Legistar Web API client: events for a body, their agenda items, and
//! per-item roll calls.

use async_trait::async_trait;
use councilvote_core::{AgendaItem, Event, MonthRange, RollCall};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{EventSource, RetryPolicy, SourceError};

/// HTTP client for one Legistar client site (e.g. `/v1/phoenix`).
pub struct LegistarClient {
    client: reqwest::Client,
    api_base: String,
    body_id: i64,
    retry: RetryPolicy,
}

impl LegistarClient {
    /// `api_base` should be like `https://webapi.legistar.com/v1/phoenix`.
    pub fn new(api_base: &str, body_id: i64) -> Result<Self, SourceError> {
        Self::with_retry(api_base, body_id, RetryPolicy::default())
    }

    pub fn with_retry(api_base: &str, body_id: i64, retry: RetryPolicy) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(retry.request_timeout)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            body_id,
            retry,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// OData filter selecting the body's meetings inside the month window.
    pub fn events_filter(&self, year: i32, months: MonthRange) -> String {
        let (first, after) = months.date_bounds(year);
        format!(
            "EventBodyId eq {} and EventDate ge datetime'{first}' and EventDate lt datetime'{after}'",
            self.body_id
        )
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        let resp = self.client.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        debug!(url, "fetching");
        self.retry.run(url, || self.fetch_once(url, query)).await
    }
}

#[async_trait]
impl EventSource for LegistarClient {
    async fn list_events(&self, year: i32, months: MonthRange) -> Result<Vec<Event>, SourceError> {
        let url = format!("{}/events", self.api_base);
        let query = [
            ("$filter", self.events_filter(year, months)),
            ("$orderby", "EventDate asc".to_string()),
        ];
        info!(url = %url, year, start = months.start(), end = months.end(), "listing events");
        let events: Vec<Event> = self.fetch(&url, &query).await?;
        info!(count = events.len(), "listed events");
        Ok(events)
    }

    async fn list_items(&self, event_id: i64) -> Result<Vec<AgendaItem>, SourceError> {
        let url = format!("{}/events/{event_id}/eventitems", self.api_base);
        let items: Vec<AgendaItem> = self.fetch(&url, &[]).await?;
        debug!(event_id, count = items.len(), "listed agenda items");
        Ok(items)
    }

    async fn list_roll_calls(&self, event_item_id: i64) -> Result<Vec<RollCall>, SourceError> {
        let url = format!("{}/eventitems/{event_item_id}/rollcalls", self.api_base);
        self.fetch(&url, &[]).await
    }
}
