//! The fetch pipeline: resolve, fetch, parse, then record.
//!
//! A [`WeatherSession`] owns the history for the lifetime of the process and
//! runs at most one fetch at a time. A trigger that arrives while another
//! fetch is running is rejected with [`WeatherError::Busy`].

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::{
    error::{ErrorKind, WeatherError},
    history::HistoryLog,
    model::{DisplayFields, LocationQuery, UnitPreference, WeatherRecord},
    parser,
    provider::WeatherProvider,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Resolving,
    Fetching,
    Parsing,
    Displayed,
    Failed(ErrorKind),
}

/// Everything the shell needs to render a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub label: String,
    pub record: WeatherRecord,
    pub display: DisplayFields,
    pub history_line: String,
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Box<dyn WeatherProvider>,
    in_flight: AtomicBool,
    state: Mutex<FetchState>,
    last_query: Mutex<Option<LocationQuery>>,
    history: Mutex<HistoryLog>,
}

/// Holds the in-flight flag for one fetch. Dropping it before
/// [`InFlight::finish`] (a cancelled fetch) puts the state back to `Idle`.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    state: &'a Mutex<FetchState>,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a Mutex<FetchState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state, finished: false })
    }

    fn finish(&mut self, outcome: FetchState) {
        *self.state.lock() = outcome;
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("fetch dropped before completion");
            *self.state.lock() = FetchState::Idle;
        }
        self.flag.store(false, Ordering::Release);
    }
}

impl WeatherSession {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(FetchState::Idle),
            last_query: Mutex::new(None),
            history: Mutex::new(HistoryLog::new()),
        }
    }

    pub fn state(&self) -> FetchState {
        *self.state.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the history, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.lock().entries().to_vec()
    }

    pub fn last_query(&self) -> Option<LocationQuery> {
        self.last_query.lock().clone()
    }

    /// Run one fetch for `query` in `unit`.
    ///
    /// Input is validated before anything else; history and display data are
    /// only touched once the payload parsed completely.
    pub async fn fetch(
        &self,
        query: LocationQuery,
        unit: UnitPreference,
    ) -> Result<FetchOutcome, WeatherError> {
        let Some(mut guard) = InFlight::acquire(&self.in_flight, &self.state) else {
            warn!("fetch triggered while another is in flight");
            return Err(WeatherError::Busy);
        };

        let result = self.run(query, unit).await;

        let outcome = match &result {
            Ok(outcome) => {
                info!(label = %outcome.label, "{}", outcome.history_line);
                FetchState::Displayed
            }
            Err(err) => {
                debug!(error = %err, "fetch failed");
                FetchState::Failed(err.kind())
            }
        };
        debug!(state = ?outcome, "fetch state");
        guard.finish(outcome);

        result
    }

    /// Re-run the most recently submitted query.
    pub async fn refresh(&self, unit: UnitPreference) -> Result<FetchOutcome, WeatherError> {
        let query = self.last_query().ok_or(WeatherError::Input)?;
        self.fetch(query, unit).await
    }

    async fn run(
        &self,
        query: LocationQuery,
        unit: UnitPreference,
    ) -> Result<FetchOutcome, WeatherError> {
        query.validate()?;
        *self.last_query.lock() = Some(query.clone());

        self.set_state(FetchState::Resolving);
        let coords = self.provider.resolve(&query).await?;

        self.set_state(FetchState::Fetching);
        let payload = self.provider.fetch(coords, unit).await?;

        self.set_state(FetchState::Parsing);
        let record = parser::parse(&payload, unit)?;

        let label = query.label().to_string();
        let history_line = self.history.lock().append(&label, &record).to_string();

        Ok(FetchOutcome { display: record.display(), label, record, history_line })
    }

    fn set_state(&self, state: FetchState) {
        debug!(?state, "fetch state");
        *self.state.lock() = state;
    }
}
