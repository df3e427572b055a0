//! Sequential and parallel meeting processing.
//!
//! Each worker owns one page session for its whole shard; nothing mutable
//! is shared between workers. Both modes return bundles in the same order.

use std::sync::Arc;

use councilvote_core::Event;
use councilvote_legistar::EventSource;
use councilvote_scrape::{MeetingPage, SessionFactory};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::bundle::sort_bundles;
use crate::{MeetingBundle, ProcessOptions, process_event};

/// Process every meeting on one session, one meeting at a time.
pub async fn run_sequential(
    events: Vec<Event>,
    source: &dyn EventSource,
    factory: &dyn SessionFactory,
    options: &ProcessOptions,
    headless: bool,
) -> Vec<MeetingBundle> {
    let shard = events.into_iter().enumerate().collect();
    let mut bundles = run_worker(0, shard, source, factory, options, headless).await;
    sort_bundles(&mut bundles);
    bundles
}

/// Deal meetings round-robin to `workers` tasks, each with its own session,
/// and collect once all have finished.
pub async fn run_parallel(
    events: Vec<Event>,
    source: Arc<dyn EventSource>,
    factory: Arc<dyn SessionFactory>,
    options: &ProcessOptions,
    headless: bool,
    workers: usize,
) -> Vec<MeetingBundle> {
    let workers = workers.clamp(1, events.len().max(1));
    info!(workers, meetings = events.len(), "starting parallel run");

    let mut shards: Vec<Vec<(usize, Event)>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, event) in events.into_iter().enumerate() {
        shards[index % workers].push((index, event));
    }

    let mut set = JoinSet::new();
    for (worker, shard) in shards.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let factory = Arc::clone(&factory);
        let options = options.clone();
        set.spawn(async move {
            run_worker(worker, shard, source.as_ref(), factory.as_ref(), &options, headless).await
        });
    }

    let mut bundles = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(done) => bundles.extend(done),
            Err(e) => error!(error = %e, "worker task failed; its meetings are missing"),
        }
    }
    sort_bundles(&mut bundles);
    bundles
}

async fn run_worker(
    worker: usize,
    shard: Vec<(usize, Event)>,
    source: &dyn EventSource,
    factory: &dyn SessionFactory,
    options: &ProcessOptions,
    headless: bool,
) -> Vec<MeetingBundle> {
    let mut session: Option<Box<dyn MeetingPage>> = match factory.open(headless).await {
        Ok(page) => Some(page),
        Err(e) => {
            warn!(worker, error = %e, "could not open a page session; meetings get API data only");
            None
        }
    };

    let mut bundles = Vec::with_capacity(shard.len());
    for (index, event) in shard {
        let page: Option<&mut dyn MeetingPage> = match session.as_mut() {
            Some(page) => Some(&mut **page),
            None => None,
        };
        let bundle = process_event(index, event, source, page, options).await;
        info!(
            worker,
            event_id = bundle.event.id,
            items = bundle.items.len(),
            "meeting done"
        );
        bundles.push(bundle);
    }
    bundles
}
