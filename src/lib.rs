//! # Votedesk
//!
//! Election desk - a terminal client and library for a voting survey
//! platform's REST backend.
//!
//! ## Features
//!
//! - **Live tally**: polls the active constituency every 5 seconds and keeps
//!   a ranked leaderboard with the leading party (or parties) flagged
//! - **Constituency table**: parties grouped by constituency
//! - **Registration**: party and voter sign-up with client-side checks
//! - **Login**: voter and admin sessions as explicit values
//!
//! ## Modules
//!
//! - [`tally`]: snapshot ranking, view state and the poll task
//! - [`client`]: typed HTTP client for the backend
//! - [`model`]: wire schemas and decode-time validation
//! - [`grouping`]: constituency grouping for the admin table
//! - [`forms`]: form validation
//! - [`session`]: session state and navigation
//! - [`render`]: terminal output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use votedesk::client::{ClientConfig, ElectionClient};
//! use votedesk::tally::{TallyPoller, ViewState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ElectionClient::new(ClientConfig::default())?);
//!
//!     // Mount the live view: one fetch now, then every 5 seconds
//!     let mut view = TallyPoller::with_default_interval(client).mount();
//!
//!     while let Some(state) = view.changed().await {
//!         if let ViewState::Live(snapshot) = state {
//!             for leader in snapshot.leaders() {
//!                 println!("{} leads with {} votes", leader.name, leader.number_of_votes);
//!             }
//!             break;
//!         }
//!     }
//!
//!     // Dropping the handle cancels the poll timer
//!     view.unmount();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod forms;
pub mod grouping;
pub mod model;
pub mod render;
pub mod session;
pub mod tally;

// Re-export top-level types for convenience
pub use client::{ClientConfig, ClientError, ClientResult, ElectionClient, FailureKind};

pub use model::{Constituency, DecodeError, PartyTally};

pub use tally::{
    bar_width_percent, LiveTallyView, PollHandle, TallyPoller, TallySnapshot, TallySource,
    ViewState,
};

pub use grouping::{group_by_constituency, ConstituencyGroup};

pub use forms::{LoginForm, PartyForm, ValidationError, VoterSignupForm};

pub use session::{Role, Session};

pub use config::{Config, ConfigError, LoggingConfig};
