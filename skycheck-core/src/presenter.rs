use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    client::WeatherFetcher,
    error::FetchError,
    model::{WeatherQuery, WeatherReading},
};

/// Lifecycle of one fetch attempt as seen by a display layer.
///
/// Exactly one variant is active at a time. Per request the transitions are
/// `Idle/Success/Failure -> Loading -> Success | Failure`; every attempt ends
/// in exactly one terminal outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchOutcome {
    #[default]
    Idle,
    Loading,
    Success(WeatherReading),
    Failure(FetchError),
}

impl FetchOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchOutcome::Loading)
    }
}

/// Sequences fetches and exposes the latest [`FetchOutcome`] for polling.
///
/// Concurrent requests are allowed and nothing in flight is cancelled, but
/// resolutions are sequenced: each request takes a monotonic sequence number
/// and a resolution is applied only if no newer request has been issued since.
/// The latest-issued request therefore owns the displayed state, regardless
/// of the order in which responses arrive.
pub struct WeatherPresenter {
    fetcher: Arc<dyn WeatherFetcher>,
    state: Mutex<PresenterState>,
}

#[derive(Debug, Default)]
struct PresenterState {
    outcome: FetchOutcome,
    issued: u64,
}

impl WeatherPresenter {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>) -> Self {
        Self {
            fetcher,
            state: Mutex::new(PresenterState::default()),
        }
    }

    /// Run one fetch to completion.
    ///
    /// The state moves to `Loading` before the network call starts. Returns
    /// the latest outcome, which is this request's terminal outcome unless a
    /// newer request superseded it while it was in flight.
    pub async fn request_fetch(&self, query: WeatherQuery) -> FetchOutcome {
        let seq = {
            let mut state = self.state.lock();
            state.issued += 1;
            state.outcome = FetchOutcome::Loading;
            state.issued
        };

        let result = self.fetcher.fetch(&query).await;

        let mut state = self.state.lock();
        if seq == state.issued {
            state.outcome = match result {
                Ok(reading) => FetchOutcome::Success(reading),
                Err(err) => FetchOutcome::Failure(err),
            };
        }
        state.outcome.clone()
    }

    /// Latest outcome, for display layers that poll.
    pub fn outcome(&self) -> FetchOutcome {
        self.state.lock().outcome.clone()
    }
}
