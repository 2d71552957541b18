//! Core data types for the election backend
//!
//! This module defines the records exchanged with the REST API:
//! - `Constituency`: an electoral district and whether its election is live
//! - `PartyTally`: a party, its candidate and its current vote count
//! - Request payloads for registration and login
//!
//! Field names follow the backend's camelCase JSON.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{DecodeError, DecodeResult};

/// An electoral district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constituency {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub election_active: bool,
    /// Opaque extra data the constituency endpoint attaches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dols: Option<serde_json::Value>,
}

impl Constituency {
    /// Create a constituency record
    pub fn new(id: u64, name: impl Into<String>, state: impl Into<String>, election_active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.into(),
            election_active,
            dols: None,
        }
    }

    /// Status label used by the constituency list
    pub fn status_label(&self) -> &'static str {
        if self.election_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// A party contesting a constituency, with its current tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyTally {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub candidate_name: String,
    /// Party symbol URL
    #[serde(default)]
    pub img: String,
    pub number_of_votes: u64,
    pub constituency: Constituency,
}

impl PartyTally {
    /// Create a tally record
    pub fn new(id: u64, name: impl Into<String>, number_of_votes: u64, constituency: Constituency) -> Self {
        Self {
            id,
            name: name.into(),
            candidate_name: String::new(),
            img: String::new(),
            number_of_votes,
            constituency,
        }
    }

    /// Builder method: set the candidate name
    pub fn candidate(mut self, candidate_name: impl Into<String>) -> Self {
        self.candidate_name = candidate_name.into();
        self
    }

    /// Builder method: set the party symbol URL
    pub fn img(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    /// Id of the constituency this party contests
    pub fn constituency_id(&self) -> u64 {
        self.constituency.id
    }
}

/// Decode-time checks for records coming off the wire
pub trait Validate {
    fn validate(&self) -> DecodeResult<()>;
}

impl Validate for Constituency {
    fn validate(&self) -> DecodeResult<()> {
        if self.id == 0 {
            return Err(DecodeError::invalid("constituency", "id", "must be a positive integer"));
        }
        if self.name.trim().is_empty() {
            return Err(DecodeError::invalid("constituency", "name", "must not be empty"));
        }
        Ok(())
    }
}

impl Validate for PartyTally {
    fn validate(&self) -> DecodeResult<()> {
        if self.id == 0 {
            return Err(DecodeError::invalid("party", "id", "must be a positive integer"));
        }
        if self.name.trim().is_empty() {
            return Err(DecodeError::invalid("party", "name", "must not be empty"));
        }
        self.constituency.validate()
    }
}

/// Decode a JSON array body into validated records
pub fn decode_list<T>(body: &[u8]) -> DecodeResult<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    let records: Vec<T> = serde_json::from_slice(body)?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

/// Decode a single JSON object body into a validated record
pub fn decode_one<T>(body: &[u8]) -> DecodeResult<T>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_slice(body)?;
    record.validate()?;
    Ok(record)
}

// ============================================
// Request payloads
// ============================================

/// Reference to an existing constituency by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConstituencyRef {
    pub id: u64,
}

/// Body of `POST /api/party`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParty {
    pub name: String,
    pub candidate_name: String,
    pub img: String,
    pub candidate_img: String,
    pub constituency: ConstituencyRef,
}

/// Body of `POST /api/user/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRegistration {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: u32,
    pub gender: String,
    pub address: String,
    pub constituency: String,
    pub constituency_number: u32,
    /// Always `false` for a fresh registration
    pub has_voted: bool,
}

/// Body of `POST /api/user/login`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterCredentials {
    pub voter_id: String,
    pub password: String,
}

/// Body of `POST /api/admin/auth`
#[derive(Debug, Clone, Serialize)]
pub struct AdminCredentials {
    pub id: String,
    pub password: String,
}
