use std::sync::mpsc;
use std::thread;

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// WIRE TYPES — request/response bodies of the Doctrine API
// ============================================================================

#[derive(Serialize)]
struct Credentials {
    email_address: String,
    password: String,
}

#[derive(Deserialize)]
struct LogInBody {
    token: String,
    account: AccountRef,
}

#[derive(Deserialize)]
struct AccountRef {
    id: u64,
}

#[derive(Deserialize)]
struct GeneratedImageBody {
    image: String,
}

#[derive(Serialize)]
struct NewProfile {
    account_id: u64,
    name: String,
    picture: String,
}

/// Account detail returned by `GET /api/accounts/{id}`.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountDetail {
    pub email_address: String,
    pub creation_time: String,
    #[serde(default)]
    pub is_developer: bool,
    #[serde(default)]
    pub profiles: Vec<ProfileDetail>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProfileDetail {
    pub name: String,
    pub entity: EntityDetail,
    /// Encoded avatar (base64 of nibble-packed cells).
    pub picture: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EntityDetail {
    pub wallet: WalletDetail,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WalletDetail {
    pub value: f64,
}

// ============================================================================
// OUTCOMES & ERRORS
// ============================================================================

/// Failure to complete an exchange at all. HTTP error statuses are not
/// errors — they are ordinary outcomes below; the UI gives both the same
/// generic-fault treatment but only these carry diagnostic detail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum CreateAccountOutcome {
    Created,
    /// 409 — an account with this email address already exists.
    EmailInUse,
    ServerFault,
}

#[derive(Debug)]
pub enum LogInOutcome {
    LoggedIn { token: String, account_id: u64 },
    /// 403.
    InvalidCredentials,
    ServerFault,
}

#[derive(Debug)]
pub enum FetchAccountOutcome {
    Fetched(Box<AccountDetail>),
    /// Any non-200: the stored token or account id is no longer usable.
    SessionInvalid,
}

#[derive(Debug)]
pub enum CreateProfileOutcome {
    Created(Box<ProfileDetail>),
    /// 409 — profile name already taken.
    NameTaken,
    ServerFault,
}

/// One completed exchange, delivered on the app's event channel. Every
/// dispatched request produces exactly one event.
#[derive(Debug)]
pub enum ApiEvent {
    AccountCreated(Result<CreateAccountOutcome, ApiError>),
    LoggedIn(Result<LogInOutcome, ApiError>),
    AccountFetched(Result<FetchAccountOutcome, ApiError>),
    ProfileCreated(Result<CreateProfileOutcome, ApiError>),
    AvatarGenerated(Result<String, ApiError>),
}

// ============================================================================
// API CLIENT — one worker thread per exchange, results over a channel
// ============================================================================

/// Client for the Doctrine backend.
///
/// Each request runs on its own worker thread and delivers one [`ApiEvent`]
/// through the channel handed in at construction; the app drains the channel
/// once per frame. Requests are fire-and-forget: no retry, no cancellation,
/// no de-duplication of doubled-up submissions.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
    sender: mpsc::Sender<ApiEvent>,
}

impl ApiClient {
    pub fn new(base_url: String, sender: mpsc::Sender<ApiEvent>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
            sender,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach a bearer token to every subsequent request.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // -- dispatchers ---------------------------------------------------------

    pub fn create_account(&self, email: &str, password: &str) {
        let request = self.post("/api/accounts/").json(&Credentials {
            email_address: email.to_string(),
            password: password.to_string(),
        });
        self.spawn(move || ApiEvent::AccountCreated(create_account_exchange(request)));
    }

    pub fn log_in(&self, email: &str, password: &str) {
        let request = self.post("/api/login").json(&Credentials {
            email_address: email.to_string(),
            password: password.to_string(),
        });
        self.spawn(move || ApiEvent::LoggedIn(log_in_exchange(request)));
    }

    pub fn fetch_account(&self, account_id: u64) {
        let request = self.get(&format!("/api/accounts/{account_id}"));
        self.spawn(move || ApiEvent::AccountFetched(fetch_account_exchange(request)));
    }

    pub fn create_profile(&self, account_id: u64, name: &str, picture: &str) {
        let request = self.post("/api/profiles/").json(&NewProfile {
            account_id,
            name: name.to_string(),
            picture: picture.to_string(),
        });
        self.spawn(move || ApiEvent::ProfileCreated(create_profile_exchange(request)));
    }

    pub fn generate_avatar(&self) {
        let request = self.get("/api/generators/profile_image");
        self.spawn(move || ApiEvent::AvatarGenerated(generate_avatar_exchange(request)));
    }

    // -- plumbing ------------------------------------------------------------

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.get(format!("{}{path}", self.base_url)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.post(format!("{}{path}", self.base_url)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn spawn(&self, exchange: impl FnOnce() -> ApiEvent + Send + 'static) {
        let sender = self.sender.clone();
        thread::spawn(move || {
            // A send failure means the app already shut down; nothing to do.
            let _ = sender.send(exchange());
        });
    }
}

// ============================================================================
// EXCHANGES — one blocking request each, status mapped to a typed outcome
// ============================================================================
//
// These run on worker threads in the app, but are plain functions so tests
// can call them directly against a stub server.

pub fn create_account_exchange(
    request: RequestBuilder,
) -> Result<CreateAccountOutcome, ApiError> {
    let response = request.send()?;
    Ok(match response.status().as_u16() {
        201 => CreateAccountOutcome::Created,
        409 => CreateAccountOutcome::EmailInUse,
        _ => CreateAccountOutcome::ServerFault,
    })
}

pub fn log_in_exchange(request: RequestBuilder) -> Result<LogInOutcome, ApiError> {
    let response = request.send()?;
    Ok(match response.status().as_u16() {
        200 => {
            let body: LogInBody = serde_json::from_str(&response.text()?)?;
            LogInOutcome::LoggedIn {
                token: body.token,
                account_id: body.account.id,
            }
        }
        403 => LogInOutcome::InvalidCredentials,
        _ => LogInOutcome::ServerFault,
    })
}

pub fn fetch_account_exchange(
    request: RequestBuilder,
) -> Result<FetchAccountOutcome, ApiError> {
    let response = request.send()?;
    Ok(match response.status().as_u16() {
        200 => {
            let detail: AccountDetail = serde_json::from_str(&response.text()?)?;
            FetchAccountOutcome::Fetched(Box::new(detail))
        }
        _ => FetchAccountOutcome::SessionInvalid,
    })
}

pub fn create_profile_exchange(
    request: RequestBuilder,
) -> Result<CreateProfileOutcome, ApiError> {
    let response = request.send()?;
    Ok(match response.status().as_u16() {
        201 => {
            let profile: ProfileDetail = serde_json::from_str(&response.text()?)?;
            CreateProfileOutcome::Created(Box::new(profile))
        }
        409 => CreateProfileOutcome::NameTaken,
        _ => CreateProfileOutcome::ServerFault,
    })
}

pub fn generate_avatar_exchange(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send()?;
    let body: GeneratedImageBody = serde_json::from_str(&response.text()?)?;
    Ok(body.image)
}

// ============================================================================
// Tests
// ============================================================================
