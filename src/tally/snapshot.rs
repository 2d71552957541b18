//! Tally snapshots
//!
//! A snapshot is the complete result of one poll. It is built once and never
//! patched; the next poll replaces it wholesale.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Constituency, PartyTally};

/// Ranked tallies for the displayed constituency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallySnapshot {
    /// Parties sorted by votes, highest first; ties keep response order
    parties: Vec<PartyTally>,
    /// Highest vote count in the snapshot (0 when empty)
    max_votes: u64,
    /// Constituency of the top party
    constituency: Option<Constituency>,
    fetched_at: DateTime<Utc>,
}

/// One row of the leaderboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standing<'a> {
    /// 1-based position in sorted order
    pub position: usize,
    pub party: &'a PartyTally,
    pub is_leading: bool,
    /// Progress bar width in percent, `None` when nobody has votes yet
    pub bar_width: Option<f64>,
}

impl TallySnapshot {
    /// Rank a freshly fetched tally list
    pub fn from_tallies(mut parties: Vec<PartyTally>) -> Self {
        // sort_by is stable: equal counts keep the order the backend sent
        parties.sort_by(|a, b| b.number_of_votes.cmp(&a.number_of_votes));

        let max_votes = parties.first().map(|p| p.number_of_votes).unwrap_or(0);
        let constituency = parties.first().map(|p| p.constituency.clone());

        Self {
            parties,
            max_votes,
            constituency,
            fetched_at: Utc::now(),
        }
    }

    /// A snapshot with no parties and no constituency
    pub fn empty() -> Self {
        Self::from_tallies(Vec::new())
    }

    pub fn parties(&self) -> &[PartyTally] {
        &self.parties
    }

    pub fn max_votes(&self) -> u64 {
        self.max_votes
    }

    pub fn constituency(&self) -> Option<&Constituency> {
        self.constituency.as_ref()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Whether a party with this count holds the lead
    ///
    /// Comparison-based, so every party tied at the top leads.
    pub fn is_leading(&self, party: &PartyTally) -> bool {
        !self.is_empty() && party.number_of_votes == self.max_votes
    }

    /// All parties tied for the lead
    pub fn leaders(&self) -> impl Iterator<Item = &PartyTally> {
        self.parties.iter().filter(move |p| self.is_leading(p))
    }

    /// Sum of all votes in the snapshot
    pub fn total_votes(&self) -> u64 {
        self.parties.iter().map(|p| p.number_of_votes).sum()
    }

    /// Leaderboard rows in ranked order
    pub fn standings(&self) -> impl Iterator<Item = Standing<'_>> {
        self.parties.iter().enumerate().map(move |(i, party)| Standing {
            position: i + 1,
            party,
            is_leading: self.is_leading(party),
            bar_width: bar_width_percent(party.number_of_votes, self.max_votes),
        })
    }
}

/// Progress bar width for `votes` against the leader's `max_votes`
///
/// Returns `None` when `max_votes` is zero so callers never divide by it.
pub fn bar_width_percent(votes: u64, max_votes: u64) -> Option<f64> {
    if max_votes == 0 {
        return None;
    }
    Some(votes as f64 / max_votes as f64 * 100.0)
}
