//! Election data model
//!
//! Typed schemas for everything the election backend sends and receives:
//! - `Constituency` and `PartyTally`: decoded from the directory endpoints
//! - `NewParty`, `VoterRegistration`, credentials: request payloads
//!
//! Responses are decoded through [`decode_list`] / [`decode_one`], which reject
//! malformed bodies with a typed [`DecodeError`] instead of letting missing
//! fields slip through.

mod error;
mod types;

pub use error::{DecodeError, DecodeResult};
pub use types::{
    decode_list, decode_one, AdminCredentials, Constituency, ConstituencyRef, NewParty,
    PartyTally, Validate, VoterCredentials, VoterRegistration,
};
