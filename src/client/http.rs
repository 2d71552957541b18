//! Election REST API Client
//!
//! Thin typed wrapper over the backend endpoints.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use crate::forms::{LoginForm, LoginRequest, PartyForm, VoterSignupForm};
use crate::model::{decode_list, decode_one, Constituency, PartyTally, Validate};
use crate::session::Session;
use crate::tally::TallySource;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";

const CONSTITUENCIES: &str = "/api/constituency";
const PARTIES: &str = "/api/party";
const ACTIVE_TALLIES: &str = "/api/party/activeConstituenciePartys";
const VOTER_REGISTER: &str = "/api/user/register";
const VOTER_LOGIN: &str = "/api/user/login";
const ADMIN_AUTH: &str = "/api/admin/auth";

/// Election backend client
pub struct ElectionClient {
    client: Client,
    config: ClientConfig,
}

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8090")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// Error body some endpoints send on rejection
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ElectionClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// `GET /api/constituency`
    pub async fn constituencies(&self) -> ClientResult<Vec<Constituency>> {
        self.get_list(CONSTITUENCIES).await
    }

    /// `GET /api/party`
    pub async fn parties(&self) -> ClientResult<Vec<PartyTally>> {
        self.get_list(PARTIES).await
    }

    /// `GET /api/party/activeConstituenciePartys`
    pub async fn active_tallies(&self) -> ClientResult<Vec<PartyTally>> {
        self.get_list(ACTIVE_TALLIES).await
    }

    /// Validate and submit a new party
    ///
    /// The backend rejects ids it cannot resolve; its `message` is passed
    /// through when present.
    pub async fn register_party(&self, form: &PartyForm) -> ClientResult<PartyTally> {
        let payload = form.validate()?;

        let response = self.post_json(PARTIES, &payload).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::from_send)?;

        if status.is_success() {
            let party = decode_one(&body)?;
            tracing::info!(party = %payload.name, constituency = payload.constituency.id, "Party registered");
            Ok(party)
        } else {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            Err(ClientError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Validate and submit a voter registration
    ///
    /// A duplicate voter comes back as [`ClientError::Conflict`] carrying the
    /// backend's message.
    pub async fn register_voter(&self, form: &VoterSignupForm) -> ClientResult<()> {
        let payload = form.validate()?;

        let response = self.post_json(VOTER_REGISTER, &payload).await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!(voter_id = %payload.voter_id, "Voter registered");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            Err(ClientError::Conflict(text))
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Validate credentials and log in
    ///
    /// Succeeds only when the backend answers with the JSON literal `true`.
    pub async fn login(&self, form: &LoginForm) -> ClientResult<Session> {
        let request = form.validate()?;

        let (response, session) = match request {
            LoginRequest::Voter(creds) => {
                let session = Session::Voter {
                    voter_id: creds.voter_id.clone(),
                };
                (self.post_json(VOTER_LOGIN, &creds).await?, session)
            }
            LoginRequest::Admin(creds) => {
                let session = Session::Admin { id: creds.id.clone() };
                (self.post_json(ADMIN_AUTH, &creds).await?, session)
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.bytes().await.map_err(ClientError::from_send)?;
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(serde_json::Value::Bool(true)) => {
                tracing::info!(role = ?session.role(), "Login accepted");
                Ok(session)
            }
            _ => {
                tracing::debug!("Login rejected by backend");
                Err(ClientError::AuthRejected)
            }
        }
    }

    async fn get_list<T>(&self, path: &str) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let body = checked_body(response).await?;
        Ok(decode_list(&body)?)
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<Response> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST");

        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::from_send)
    }
}

/// Body of a successful response, or a `Status` error
async fn checked_body(response: Response) -> ClientResult<Vec<u8>> {
    let status = response.status();
    if status.is_success() {
        let body = response.bytes().await.map_err(ClientError::from_send)?;
        Ok(body.to_vec())
    } else {
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            message: text,
        })
    }
}

#[async_trait]
impl TallySource for ElectionClient {
    async fn active_tallies(&self) -> ClientResult<Vec<PartyTally>> {
        ElectionClient::active_tallies(self).await
    }
}
