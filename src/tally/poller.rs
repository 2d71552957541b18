//! Tally Poller
//!
//! Runs `LiveTallyView::refresh` once on mount and then on a fixed interval.
//! The poll task lives exactly as long as its `PollHandle`.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::view::{LiveTallyView, ViewState};
use super::TallySource;

/// Refresh period of the live tally
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Spawns the polling task for a live tally view
pub struct TallyPoller {
    source: Arc<dyn TallySource>,
    interval: Duration,
}

/// Owner of a mounted poll task
///
/// Dropping the handle unmounts the view: the timer is cancelled and an
/// in-flight fetch is abandoned without touching the published state.
pub struct PollHandle {
    task: JoinHandle<()>,
    state: watch::Receiver<ViewState>,
}

impl TallyPoller {
    pub fn new(source: Arc<dyn TallySource>, interval: Duration) -> Self {
        Self {
            source,
            // tokio intervals panic on a zero period
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    pub fn with_default_interval(source: Arc<dyn TallySource>) -> Self {
        Self::new(source, DEFAULT_POLL_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mount the view and start polling
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(self) -> PollHandle {
        let (tx, rx) = watch::channel(ViewState::Loading);

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Mounting live tally view");

        let task = tokio::spawn(poll_loop(self.source, self.interval, tx));

        PollHandle { task, state: rx }
    }
}

async fn poll_loop(source: Arc<dyn TallySource>, period: Duration, tx: watch::Sender<ViewState>) {
    let mut view = LiveTallyView::new();
    let mut ticker = tokio::time::interval(period);
    // A slow fetch pushes the schedule back instead of bunching ticks.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // first tick completes immediately
        ticker.tick().await;

        if tx.is_closed() {
            break;
        }

        view.refresh(source.as_ref()).await;

        if tx.send(view.state().clone()).is_err() {
            tracing::debug!("Live tally unmounted during fetch, discarding result");
            break;
        }
    }

    tracing::debug!(refreshes = view.refreshes(), "Live tally poll loop stopped");
}

impl PollHandle {
    /// Current view state
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Wait for the next published state
    ///
    /// Returns `None` once the poll task has stopped.
    pub async fn changed(&mut self) -> Option<ViewState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Extra receiver for another renderer
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling; equivalent to dropping the handle
    pub fn unmount(self) {}
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult};
    use crate::model::{Constituency, PartyTally};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches; optionally fails or stalls
    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
        delay: Option<Duration>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: false,
                delay: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TallySource for CountingSource {
        async fn active_tallies(&self) -> ClientResult<Vec<PartyTally>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_first && call == 0 {
                return Err(ClientError::Unavailable);
            }
            let north = Constituency::new(9, "North", "KA", true);
            Ok(vec![PartyTally::new(1, "Green", call as u64 * 10, north)])
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_on_mount_then_every_interval() {
        let source = Arc::new(CountingSource::new());
        let mut handle = TallyPoller::new(source.clone(), Duration::from_millis(5000)).mount();

        let state = handle.changed().await.unwrap();
        assert!(matches!(state, ViewState::Live(_)));
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(4999)).await;
        settle().await;
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        handle.changed().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fetch_after_unmount() {
        let source = Arc::new(CountingSource::new());
        let mut handle = TallyPoller::with_default_interval(source.clone()).mount();

        handle.changed().await.unwrap();
        assert_eq!(source.calls(), 1);

        handle.unmount();
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_dropped_after_unmount() {
        let source = Arc::new(CountingSource {
            delay: Some(Duration::from_secs(2)),
            ..CountingSource::new()
        });
        let handle = TallyPoller::with_default_interval(source.clone()).mount();
        let mut renderer = handle.subscribe();

        // let the first fetch start and stall
        settle().await;
        assert_eq!(source.calls(), 1);

        drop(handle);
        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;

        assert!(renderer.borrow_and_update().is_loading());
        assert!(renderer.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_then_recovery() {
        let source = Arc::new(CountingSource {
            fail_first: true,
            ..CountingSource::new()
        });
        let mut handle = TallyPoller::new(source.clone(), Duration::from_millis(5000)).mount();

        let state = handle.changed().await.unwrap();
        assert!(matches!(state, ViewState::Failed { .. }));

        tokio::time::advance(Duration::from_millis(5000)).await;
        let state = handle.changed().await.unwrap();
        assert_eq!(state.snapshot().unwrap().max_votes(), 10);
        assert!(handle.is_mounted());
    }

    #[test]
    fn test_zero_interval_clamped() {
        let poller = TallyPoller::new(Arc::new(CountingSource::new()), Duration::ZERO);
        assert_eq!(poller.interval(), Duration::from_millis(1));
    }
}
