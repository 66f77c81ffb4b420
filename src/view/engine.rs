// src/view/engine.rs

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info};

use crate::domain::{RecordId, Registration};
use crate::errors::StoreError;
use crate::store::RegistrationStore;
use crate::view::load::{load_working_set, WorkingSet};

/// Why the last refresh failed, kept until a later one succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub message: String,
    pub permission_denied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    /// A newer refresh already landed; this result was dropped.
    Stale,
}

struct EngineState {
    snapshot: Arc<WorkingSet>,
    committed_generation: u64,
    last_error: Option<RefreshFailure>,
}

/// Owns the current working set of one collection.
///
/// Readers take an `Arc` snapshot and never see a half-built set. Each
/// refresh gets a generation number; a completion older than the last
/// committed one is discarded, so the newest fetch wins.
pub struct RegistrationEngine {
    store: Arc<dyn RegistrationStore>,
    collection: String,
    next_generation: AtomicU64,
    /// Set while one worker runs the day-change reload.
    day_refresh_running: AtomicBool,
    state: RwLock<EngineState>,
}

impl RegistrationEngine {
    pub fn new(store: Arc<dyn RegistrationStore>, collection: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            store,
            collection: collection.into(),
            next_generation: AtomicU64::new(0),
            day_refresh_running: AtomicBool::new(false),
            state: RwLock::new(EngineState {
                snapshot: Arc::new(WorkingSet::empty(today)),
                committed_generation: 0,
                last_error: None,
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<WorkingSet> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.snapshot)
    }

    pub fn last_error(&self) -> Option<RefreshFailure> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.last_error.clone()
    }

    /// Fetch, sort and annotate against `today`, then swap the snapshot in.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn refresh(&self, today: NaiveDate) -> Result<RefreshOutcome, StoreError> {
        let generation = self.begin_refresh();
        let result = load_working_set(self.store.as_ref(), &self.collection, today);
        self.complete_refresh(generation, result)
    }

    /// Reload when the snapshot was derived on an earlier day.
    ///
    /// Only one caller fetches; the others serve the current snapshot
    /// until it lands.
    pub fn refresh_if_stale(&self, today: NaiveDate) {
        if self.snapshot().loaded_on == today {
            return;
        }
        if self
            .day_refresh_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("day-change refresh already running");
            return;
        }
        let _running = DayRefreshGuard(&self.day_refresh_running);

        // Another worker may have finished the reload before we got the flag.
        if self.snapshot().loaded_on == today {
            return;
        }
        if let Err(e) = self.refresh(today) {
            debug!(error = %e, "day-change refresh failed, keeping previous snapshot");
        }
    }

    fn begin_refresh(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn complete_refresh(
        &self,
        generation: u64,
        result: Result<WorkingSet, StoreError>,
    ) -> Result<RefreshOutcome, StoreError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if generation <= state.committed_generation {
            debug!(generation, committed = state.committed_generation, "discarding stale refresh");
            return match result {
                Ok(_) => Ok(RefreshOutcome::Stale),
                Err(e) => Err(e),
            };
        }

        match result {
            Ok(set) => {
                let count = set.len();
                state.snapshot = Arc::new(set);
                state.committed_generation = generation;
                state.last_error = None;
                Ok(RefreshOutcome::Applied { count })
            }
            Err(e) => {
                error!(collection = %self.collection, error = %e, "refresh failed, keeping last good data");
                state.last_error = Some(RefreshFailure {
                    message: e.user_message(),
                    permission_denied: e.is_permission_denied(),
                });
                Err(e)
            }
        }
    }

    /// Insert through the store. The caller refreshes when it wants to see it.
    pub fn insert(&self, record: &Registration) -> Result<RecordId, StoreError> {
        let id = self.store.insert(&self.collection, record)?;
        info!(collection = %self.collection, id = %id, "registration submitted");
        Ok(id)
    }
}

/// Clears the day-change flag on every exit path.
struct DayRefreshGuard<'a>(&'a AtomicBool);

impl Drop for DayRefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Refresh `engine` every `interval` on a background thread.
///
/// Failures are logged and the previous snapshot is kept; the loop never stops.
pub fn spawn_auto_refresh(engine: Arc<RegistrationEngine>, interval: Duration) -> JoinHandle<()> {
    thread::spawn(move || loop {
        thread::sleep(interval);
        match engine.refresh(Local::now().date_naive()) {
            Ok(RefreshOutcome::Applied { count }) => {
                info!(count, "registrations refreshed automatically")
            }
            Ok(RefreshOutcome::Stale) => {}
            Err(e) => error!(error = %e, "auto refresh failed"),
        }
    })
}
