use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{FetchError, FetchState, WeatherProvider, WeatherQuery, WeatherRecord};

/// Owns the fetch state for one screen and drives requests through a provider.
///
/// Every `submit` gets the next sequence number. A resolved request only
/// touches the state if its number is still the latest, so a slow response to
/// an old query can never overwrite the result of a newer one. Both the
/// sequence bump and the check happen under the watch channel's write lock.
#[derive(Debug, Clone)]
pub struct WeatherController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<FetchState>,
    latest: AtomicU64,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            inner: Arc::new(Inner { provider, state, latest: AtomicU64::new(0) }),
        }
    }

    pub fn from_boxed(provider: Box<dyn WeatherProvider>) -> Self {
        Self::new(Arc::from(provider))
    }

    /// Current state snapshot.
    pub fn state(&self) -> FetchState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that always holds the most recent state.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    /// Calls `on_change` with the current state, then with every new one.
    ///
    /// Intermediate states may be skipped if several changes land before the
    /// observer runs; the last one is always delivered.
    pub fn observe<F>(&self, mut on_change: F) -> JoinHandle<()>
    where
        F: FnMut(&FetchState) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            let current = rx.borrow_and_update().clone();
            on_change(&current);

            while rx.changed().await.is_ok() {
                let current = rx.borrow_and_update().clone();
                on_change(&current);
            }
        })
    }

    /// Start a lookup for `query`.
    ///
    /// Blank input moves straight to `Error("empty query")` and returns `None`.
    /// Otherwise the state is `Loading` when this returns and the provider call
    /// runs on a spawned task, whose handle is returned. Must be called from
    /// within a Tokio runtime.
    pub fn submit(&self, query: &str) -> Option<JoinHandle<()>> {
        let query = WeatherQuery::new(query);

        let mut seq = 0;
        self.inner.state.send_modify(|state| {
            seq = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = match &query {
                Ok(_) => FetchState::Loading,
                Err(e) => FetchState::Error(e.user_message()),
            };
        });

        let query = query.ok()?;
        let inner = Arc::clone(&self.inner);

        Some(tokio::spawn(async move {
            let outcome = inner.provider.fetch(&query).await;
            inner.resolve(seq, outcome);
        }))
    }
}

impl Inner {
    /// Apply the outcome of request `seq`. Returns false if it was superseded.
    fn resolve(&self, seq: u64, outcome: Result<WeatherRecord, FetchError>) -> bool {
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            *state = match outcome {
                Ok(record) => FetchState::Success(record),
                Err(e) => FetchState::Error(e.user_message()),
            };
            true
        })
    }
}
