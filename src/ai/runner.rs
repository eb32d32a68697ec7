//! Runs one search at a time on a worker thread so the interactive loop never
//! blocks on it.
//!
//! The worker owns a copy of the grid and shares only a cancellation flag and
//! the sending half of a channel with the runner. The loop calls
//! [`SearchRunner::poll`] once per tick; [`SearchRunner::abort`] raises the flag
//! and drops the receiver, so an aborted run can never deliver a result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::error::RunnerError;
use crate::game::{Grid, Player};

use super::search::{SearchResult, Searcher};

/// Longest stretch the worker sleeps between cancellation checks while it
/// pads out the minimum think time.
const THINK_SLICE: Duration = Duration::from_millis(10);

/// Observable state of a [`SearchRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerPhase {
    Idle,
    Running,
    Completed,
    Aborted,
}

enum RunnerState {
    Idle,
    Running {
        receiver: Receiver<SearchResult>,
        cancel: Arc<AtomicBool>,
    },
    Completed(SearchResult),
    Aborted,
}

pub struct SearchRunner {
    searcher: Searcher,
    min_think: Duration,
    state: RunnerState,
}

impl SearchRunner {
    /// `min_think` is the shortest time a run takes before its result is
    /// handed over.
    pub fn new(searcher: Searcher, min_think: Duration) -> Self {
        SearchRunner {
            searcher,
            min_think,
            state: RunnerState::Idle,
        }
    }

    pub fn phase(&self) -> RunnerPhase {
        match self.state {
            RunnerState::Idle => RunnerPhase::Idle,
            RunnerState::Running { .. } => RunnerPhase::Running,
            RunnerState::Completed(_) => RunnerPhase::Completed,
            RunnerState::Aborted => RunnerPhase::Aborted,
        }
    }

    /// True unless a search is in flight.
    pub fn is_idle(&self) -> bool {
        self.phase() != RunnerPhase::Running
    }

    /// Start searching a copy of `grid` for `player`.
    #[instrument(skip(self, grid), fields(tokens = grid.token_count()))]
    pub fn start(&mut self, grid: &Grid, player: Player, max_depth: usize) -> Result<(), RunnerError> {
        if !self.is_idle() {
            return Err(RunnerError::Busy);
        }

        let snapshot = *grid;
        let searcher = self.searcher.clone();
        let min_think = self.min_think;
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let started = Instant::now();
            let Some(result) =
                searcher.best_move_cancellable(&snapshot, player, max_depth, &worker_cancel)
            else {
                debug!("search cancelled");
                return;
            };
            debug!(
                column = ?result.column,
                score = result.score,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search finished"
            );

            loop {
                if worker_cancel.load(Ordering::Relaxed) {
                    return;
                }
                let remaining = min_think.saturating_sub(started.elapsed());
                if remaining.is_zero() {
                    break;
                }
                thread::sleep(remaining.min(THINK_SLICE));
            }

            // Fails only if the runner has already let go of the receiver.
            let _ = sender.send(result);
        });

        self.state = RunnerState::Running { receiver, cancel };
        Ok(())
    }

    /// Non-blocking completion check. Returns true exactly once per run, on
    /// the call that observes the result; [`result`](Self::result) is readable
    /// from then until the next [`start`](Self::start).
    pub fn poll(&mut self) -> bool {
        let RunnerState::Running { receiver, .. } = &self.state else {
            return false;
        };

        match receiver.try_recv() {
            Ok(result) => {
                self.state = RunnerState::Completed(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!("search worker exited without a result");
                self.state = RunnerState::Aborted;
                false
            }
        }
    }

    /// Cancel the current run, if any. Safe to call in every phase; nothing
    /// from an aborted run is ever delivered.
    pub fn abort(&mut self) {
        if let RunnerState::Running { cancel, .. } = &self.state {
            cancel.store(true, Ordering::Relaxed);
            info!("search aborted");
        }
        self.state = RunnerState::Aborted;
    }

    /// The completed run's result.
    pub fn result(&self) -> Option<SearchResult> {
        match self.state {
            RunnerState::Completed(result) => Some(result),
            _ => None,
        }
    }
}

impl Drop for SearchRunner {
    fn drop(&mut self) {
        if let RunnerState::Running { cancel, .. } = &self.state {
            cancel.store(true, Ordering::Relaxed);
        }
    }
}
