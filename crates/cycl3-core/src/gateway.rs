//! Adaptation layer between the app and the network client.
//!
//! The `Gateway` owns the `SessionStore` and an `AtpClient`. Every operation
//! checks for a session first, hands it to the client explicitly, and folds
//! any failure into a `GatewayError` whose `Display` is the message shown to
//! the user. Nothing is retried.

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::{ApiError, AtpClient};
use crate::auth::{format_identifier, Session, SessionStore};
use crate::models::{ActorSummary, Post, Profile, RecordRef};

/// Number of actors returned by a user search
pub const SEARCH_LIMIT: u8 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Too many attempts, please try again later")]
    RateLimited,

    #[error("{0}")]
    Failed(String),
}

impl GatewayError {
    /// Classify a failed login. Only 401 and 429 get dedicated messages.
    fn from_login(err: &ApiError) -> Self {
        match err.status() {
            Some(401) => GatewayError::InvalidCredentials,
            Some(429) => GatewayError::RateLimited,
            _ => {
                let message = err.to_string();
                if message.trim().is_empty() {
                    GatewayError::Failed("Login failed".to_string())
                } else {
                    GatewayError::Failed(message)
                }
            }
        }
    }

    fn from_api(err: ApiError) -> Self {
        GatewayError::Failed(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Session-aware façade over an `AtpClient`.
#[derive(Clone)]
pub struct Gateway<C> {
    client: C,
    store: SessionStore,
}

impl<C: AtpClient> Gateway<C> {
    pub fn new(client: C, store: SessionStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn session(&self) -> Option<&Session> {
        self.store.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Restore a persisted session, if any. A corrupt file counts as no session.
    pub fn restore(&mut self) -> bool {
        match self.store.load() {
            Ok(restored) => restored,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session file");
                false
            }
        }
    }

    fn require_session(&self) -> GatewayResult<&Session> {
        self.store.current().ok_or(GatewayError::NotAuthenticated)
    }

    /// Log in and make the new session current.
    pub async fn login(&mut self, identifier: &str, password: &str) -> GatewayResult<Session> {
        let identifier = format_identifier(identifier);
        info!(identifier = %identifier, "Attempting login");

        match self.client.create_session(&identifier, password).await {
            Ok(session) => {
                self.store.update(session.clone());
                if let Err(e) = self.store.save() {
                    warn!(error = %e, "Failed to persist session");
                }
                info!(handle = %session.handle, "Login successful");
                Ok(session)
            }
            Err(e) => {
                error!(error = %e, status = ?e.status(), "Login failed");
                Err(GatewayError::from_login(&e))
            }
        }
    }

    /// Forget the current session. The server is not told.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(handle) = self.store.handle() {
            info!(handle = %handle, "Logging out");
        }
        self.store.clear()
    }

    pub async fn get_timeline(&self) -> GatewayResult<Vec<Post>> {
        let session = self.require_session()?;
        self.client.get_timeline(session).await.map_err(|e| {
            error!(error = %e, "Timeline fetch failed");
            GatewayError::from_api(e)
        })
    }

    pub async fn create_post(&self, text: &str) -> GatewayResult<RecordRef> {
        let session = self.require_session()?;
        self.client
            .create_post(session, text, Utc::now())
            .await
            .map_err(|e| {
                error!(error = %e, "Post creation failed");
                GatewayError::from_api(e)
            })
    }

    pub async fn search_users(&self, term: &str) -> GatewayResult<Vec<ActorSummary>> {
        let session = self.require_session()?;
        self.client
            .search_actors(session, term, SEARCH_LIMIT)
            .await
            .map_err(|e| {
                error!(error = %e, term, "User search failed");
                GatewayError::from_api(e)
            })
    }

    pub async fn get_profile(&self, actor: &str) -> GatewayResult<Profile> {
        let session = self.require_session()?;
        self.client.get_profile(session, actor).await.map_err(|e| {
            error!(error = %e, actor, "Profile fetch failed");
            GatewayError::from_api(e)
        })
    }

    pub async fn follow_user(&self, did: &str) -> GatewayResult<RecordRef> {
        let session = self.require_session()?;
        self.client
            .follow(session, did, Utc::now())
            .await
            .map_err(|e| {
                error!(error = %e, did, "Follow failed");
                GatewayError::from_api(e)
            })
    }
}
