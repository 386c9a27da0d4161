//! Background sweeper that auto-returns overdue borrows.
//!
//! Runs server-side on a fixed interval, so overdue loans close even if no
//! request ever touches them. The sweep is one set-based update, so a tick
//! racing a manual return is harmless: the loser matches zero rows.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::{config::LoansConfig, repository::borrows::BorrowsRepository};

pub struct Sweeper {
    borrows: BorrowsRepository,
    interval: Duration,
    started: Arc<AtomicBool>,
}

impl Sweeper {
    pub fn new(borrows: BorrowsRepository, config: &LoansConfig) -> Self {
        Self {
            borrows,
            interval: Duration::from_secs(config.sweep_interval_seconds),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the periodic sweep task. Returns `None` if already started, so
    /// a double start under a process supervisor is a logged no-op. Ticks
    /// are coalesced: a slow sweep delays the next tick rather than
    /// stacking a second concurrent run.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("Overdue sweeper already started, ignoring");
            return None;
        }

        info!(
            interval_seconds = self.interval.as_secs(),
            "Starting overdue sweeper"
        );

        let borrows = self.borrows.clone();
        let period = self.interval;

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                run_sweep(&borrows).await;
            }
        }))
    }
}

/// One sweep tick. Failures are logged and skipped; the sweep is idempotent
/// so a later successful tick restores correctness.
async fn run_sweep(borrows: &BorrowsRepository) {
    let now = Utc::now();
    match borrows.sweep_expired(now).await {
        Ok(0) => {}
        Ok(count) => info!(count, "Auto-returned overdue borrow(s)"),
        Err(e) => error!(error = %e, "Overdue sweep failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn sweeper_starts_at_most_once() {
        // Lazy pool: no connection is made until a query runs
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let sweeper = Sweeper::new(
            BorrowsRepository::new(pool),
            &LoansConfig {
                duration_days: 7,
                sweep_interval_seconds: 3600,
            },
        );

        let handle = sweeper.start();
        assert!(handle.is_some());
        assert!(sweeper.start().is_none());

        handle.unwrap().abort();
    }
}
