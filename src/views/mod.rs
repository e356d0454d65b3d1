//! View controllers, one per console screen.
//!
//! A controller owns everything a screen keeps between events: the last
//! fetched collection, search and sort state, open dialog, loading and
//! submitting flags and the current error notice. Renderers read from it,
//! user actions call into it. Controllers are shared behind `Arc` and take
//! `&self`; state sits in short-lived `std::sync::Mutex` sections that are
//! never held across an `.await`.

pub mod copilot;
pub mod dashboard;
pub mod inventory;
pub mod logs;
pub mod shipping;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::ApiError;
use crate::table::bulk::BulkPlanError;

pub use copilot::CopilotView;
pub use dashboard::DashboardView;
pub use inventory::InventoryView;
pub use logs::LogsView;
pub use shipping::ShippingView;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Another request is still in progress")]
    Busy,
    #[error(transparent)]
    Plan(#[from] BulkPlanError),
    #[error("No record with id {0}")]
    UnknownRecord(String),
    #[error("No dialog is open")]
    NoDialog,
    #[error("{0}")]
    Invalid(String),
}

impl ViewError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ViewError::Api(ApiError::Cancelled))
    }
}

/// Lock a view mutex, recovering the data if a panicking thread poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Loading indicator. Counts overlapping fetches so a reload triggered by a
/// write does not clear the spinner of a fetch that is still running.
#[derive(Debug, Default)]
pub(crate) struct LoadingFlag(AtomicUsize);

impl LoadingFlag {
    pub fn start(&self) -> LoadingGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(&self.0)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

pub(crate) struct LoadingGuard<'a>(&'a AtomicUsize);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Submitting flag behind every dialog's submit button. While a guard is
/// alive a second submit is refused instead of sent.
#[derive(Debug, Default)]
pub(crate) struct SubmitFlag(AtomicBool);

impl SubmitFlag {
    pub fn try_start(&self) -> Result<SubmitGuard<'_>, ViewError> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .map(|_| SubmitGuard(&self.0))
            .map_err(|_| ViewError::Busy)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub(crate) struct SubmitGuard<'a>(&'a AtomicBool);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// The blocking error message a view shows after a failed action.
#[derive(Debug, Default)]
pub(crate) struct Notice(Mutex<Option<String>>);

impl Notice {
    pub fn raise(&self, message: impl Into<String>) {
        *lock(&self.0) = Some(message.into());
    }

    pub fn get(&self) -> Option<String> {
        lock(&self.0).clone()
    }

    pub fn dismiss(&self) {
        *lock(&self.0) = None;
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Run the fetch `fut` unless the view is dismounted first. A response that
/// loses the race is dropped and never written into view state. Writes are
/// not raced: once sent they run to completion.
pub(crate) async fn until_dismount<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        result = fut => result,
    }
}

/// Log a failed read; cancellations are expected on dismount and stay quiet.
pub(crate) fn log_read_failure(view: &str, err: &ApiError) {
    if !matches!(err, ApiError::Cancelled) {
        warn!(view, error = %err, "failed to load view data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_flag_refuses_second_submit_until_released() {
        let flag = SubmitFlag::default();
        let guard = flag.try_start().unwrap();
        assert!(flag.is_set());
        assert_eq!(flag.try_start().err(), Some(ViewError::Busy));
        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_start().is_ok());
    }

    #[test]
    fn loading_flag_counts_overlapping_fetches() {
        let flag = LoadingFlag::default();
        let first = flag.start();
        let second = flag.start();
        drop(first);
        assert!(flag.is_set());
        drop(second);
        assert!(!flag.is_set());
    }

    #[tokio::test]
    async fn dismounted_view_discards_result() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = until_dismount(&cancel, async { Ok::<_, ApiError>(1) }).await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }

    #[tokio::test]
    async fn live_view_receives_result() {
        let cancel = CancellationToken::new();
        let result = until_dismount(&cancel, async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
