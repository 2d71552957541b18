//! Election backend client
//!
//! HTTP client for the election platform's REST API:
//! - Directory reads: constituencies, parties, active-constituency tallies
//! - Writes: party registration, voter sign-up
//! - Voter and admin login
//!
//! Form input is validated before any request is built.

mod error;
mod http;

pub use error::{ClientError, ClientResult, FailureKind};
pub use http::{ClientConfig, ElectionClient, DEFAULT_BASE_URL};
