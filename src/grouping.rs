//! Constituency grouping
//!
//! Buckets a flat party listing by the constituency each party contests,
//! for the administrative constituency table.

use serde::Serialize;
use std::collections::HashMap;

use crate::model::{Constituency, PartyTally};

/// Parties contesting one constituency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstituencyGroup {
    pub constituency: Constituency,
    /// In the order they appeared in the listing
    pub parties: Vec<PartyTally>,
}

impl ConstituencyGroup {
    /// Badge shown next to the constituency name
    pub fn status_badge(&self) -> &'static str {
        if self.constituency.election_active {
            "LIVE"
        } else {
            "ENDED"
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.parties.iter().map(|p| p.number_of_votes).sum()
    }
}

/// Group parties by constituency id
///
/// Constituencies appear in first-seen order; parties keep their relative
/// order inside each group. The constituency record of the first party seen
/// for an id represents the group.
pub fn group_by_constituency(parties: &[PartyTally]) -> Vec<ConstituencyGroup> {
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut groups: Vec<ConstituencyGroup> = Vec::new();

    for party in parties {
        let slot = *index.entry(party.constituency_id()).or_insert_with(|| {
            groups.push(ConstituencyGroup {
                constituency: Constituency {
                    dols: None,
                    ..party.constituency.clone()
                },
                parties: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].parties.push(party.clone());
    }

    groups
}
