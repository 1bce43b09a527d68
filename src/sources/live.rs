//! Live sources: deliver full-replacement snapshots of the per-user records.

use super::{parse_records_json, Subscription};
use crate::catalog::Record;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Receives each new live snapshot.
pub type UpdateCallback = Box<dyn Fn(Vec<Record>) + Send + Sync>;

/// A long-lived source of live record snapshots.
///
/// Every delivery is the complete live list and replaces the previous one.
pub trait LiveSource: Send + Sync {
    fn subscribe(&self, on_update: UpdateCallback) -> Subscription;
}

type SharedCallback = Arc<dyn Fn(Vec<Record>) + Send + Sync>;

#[derive(Default)]
struct FeedState {
    next_id: u64,
    subscribers: Vec<(u64, SharedCallback)>,
    latest: Option<Vec<Record>>,
}

/// In-process live source.
///
/// [`LiveFeed::publish`] delivers a snapshot to every subscriber. A subscriber
/// joining later immediately receives the latest snapshot, like a store
/// listener does on attach. Deliveries are serialized, so every subscriber
/// sees snapshots in publish order. Callbacks must not publish to or
/// subscribe on the same feed.
#[derive(Clone, Default)]
pub struct LiveFeed {
    state: Arc<Mutex<FeedState>>,
    delivery: Arc<Mutex<()>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, records: Vec<Record>) {
        let _delivery = lock(&self.delivery);
        let subscribers: Vec<SharedCallback> = {
            let mut state = lock(&self.state);
            state.latest = Some(records.clone());
            state.subscribers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        debug!(
            "Publishing live snapshot of {} records to {} subscribers",
            records.len(),
            subscribers.len()
        );
        for callback in subscribers {
            callback(records.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

impl LiveSource for LiveFeed {
    fn subscribe(&self, on_update: UpdateCallback) -> Subscription {
        let callback: SharedCallback = Arc::from(on_update);
        let _delivery = lock(&self.delivery);
        let (id, latest) = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, callback.clone()));
            (id, state.latest.clone())
        };

        if let Some(records) = latest {
            callback(records);
        }

        let weak: Weak<Mutex<FeedState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }
}

/// Live source backed by a JSON file on disk.
///
/// The file is read on subscription and, when an interval is set, re-read on
/// every tick; a snapshot is delivered whenever the content changed.
/// Subscribing requires a running Tokio runtime.
pub struct PollingFileLiveSource {
    path: PathBuf,
    interval: Option<Duration>,
}

impl PollingFileLiveSource {
    /// A zero interval reads the file a single time.
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval: (!interval.is_zero()).then_some(interval),
        }
    }

    /// Reads the file a single time.
    pub fn once(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: None,
        }
    }
}

impl LiveSource for PollingFileLiveSource {
    fn subscribe(&self, on_update: UpdateCallback) -> Subscription {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                error!("Cannot watch {}: {}", self.path.display(), err);
                return Subscription::inert();
            }
        };

        let token = CancellationToken::new();
        handle.spawn(poll_file(
            self.path.clone(),
            self.interval,
            on_update,
            token.clone(),
        ));
        Subscription::from_token(token)
    }
}

async fn poll_file(
    path: PathBuf,
    interval: Option<Duration>,
    on_update: UpdateCallback,
    shutdown: CancellationToken,
) {
    let mut last_content: Option<String> = None;
    let mut ticker = interval.map(tokio::time::interval);

    info!("Watching live data at {}", path.display());
    loop {
        if let Some(ticker) = ticker.as_mut() {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) if last_content.as_deref() == Some(content.as_str()) => {}
            Ok(content) => {
                match parse_records_json(&content) {
                    Ok(records) if !shutdown.is_cancelled() => {
                        debug!("Live file changed, {} records", records.len());
                        on_update(records);
                    }
                    Ok(_) => {}
                    Err(err) => warn!("Ignoring invalid live data in {}: {}", path.display(), err),
                }
                last_content = Some(content);
            }
            Err(err) => warn!("Could not read live data from {}: {}", path.display(), err),
        }

        if ticker.is_none() {
            break;
        }
    }
    debug!("Stopped watching {}", path.display());
}
