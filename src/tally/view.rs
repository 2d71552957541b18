//! Live tally view state
//!
//! Turns each poll result into what the user sees. A failure on the very
//! first load is shown; failures after that are only logged so a transient
//! error never replaces a good leaderboard.

use super::snapshot::TallySnapshot;
use super::TallySource;
use crate::client::ClientResult;
use crate::model::PartyTally;

/// Message shown when the first load fails
pub const FIRST_LOAD_ERROR: &str = "Failed to load data. Please try again.";

/// What the live tally currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Nothing has resolved yet
    Loading,
    /// The first load failed; stays until a poll succeeds
    Failed { message: String, cause: String },
    /// The backend reported no active election
    Waiting,
    /// Ranked tallies for the active constituency
    Live(TallySnapshot),
}

impl ViewState {
    pub fn snapshot(&self) -> Option<&TallySnapshot> {
        match self {
            ViewState::Live(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Live tally view
#[derive(Debug)]
pub struct LiveTallyView {
    state: ViewState,
    /// Set once the first refresh has resolved, either way
    loaded: bool,
    refreshes: u64,
}

impl LiveTallyView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            loaded: false,
            refreshes: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Number of refreshes applied so far
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Fetch the active tallies and update the view
    ///
    /// Never fails: errors end up in the view state or the log.
    pub async fn refresh(&mut self, source: &dyn TallySource) -> &ViewState {
        let result = source.active_tallies().await;
        self.apply(result);
        &self.state
    }

    /// Apply one fetch result
    pub fn apply(&mut self, result: ClientResult<Vec<PartyTally>>) {
        let first_load = !self.loaded;
        self.loaded = true;
        self.refreshes += 1;

        match result {
            Ok(tallies) => {
                let snapshot = TallySnapshot::from_tallies(tallies);
                if snapshot.is_empty() {
                    tracing::debug!("No active election reported");
                    self.state = ViewState::Waiting;
                } else {
                    tracing::debug!(
                        parties = snapshot.len(),
                        max_votes = snapshot.max_votes(),
                        constituency = snapshot.constituency().map(|c| c.id),
                        "Tally snapshot replaced"
                    );
                    self.state = ViewState::Live(snapshot);
                }
            }
            Err(e) if first_load => {
                tracing::error!(error = %e, "Initial tally load failed");
                self.state = ViewState::Failed {
                    message: FIRST_LOAD_ERROR.to_string(),
                    cause: e.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Background tally refresh failed, keeping last view");
            }
        }
    }
}

impl Default for LiveTallyView {
    fn default() -> Self {
        Self::new()
    }
}
