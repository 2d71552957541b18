//! Live Tally
//!
//! Ranked, auto-refreshing leaderboard for the constituency whose election
//! is currently active.
//!
//! ## Architecture
//!
//! - **TallySnapshot**: one poll's tallies, sorted, with the leader threshold
//! - **LiveTallyView**: view state machine driven by `refresh()`
//! - **TallyPoller**: spawns the polling task; the returned `PollHandle`
//!   cancels it when dropped
//!
//! ## Data Flow
//!
//! 1. The poller ticks immediately, then once per interval
//! 2. Each tick asks the `TallySource` for the active tallies
//! 3. The view turns the result into a new state (or keeps the old one)
//! 4. The state is published on a watch channel to whoever renders it

mod poller;
mod snapshot;
mod view;

pub use poller::{PollHandle, TallyPoller, DEFAULT_POLL_INTERVAL};
pub use snapshot::{bar_width_percent, Standing, TallySnapshot};
pub use view::{LiveTallyView, ViewState, FIRST_LOAD_ERROR};

use async_trait::async_trait;

use crate::client::ClientResult;
use crate::model::PartyTally;

/// Anything that can report the active constituency's tallies
#[async_trait]
pub trait TallySource: Send + Sync {
    /// Fetch the full, current list of tallies
    async fn active_tallies(&self) -> ClientResult<Vec<PartyTally>>;
}
