//! # Session Management
//!
//! Login, logout, restore and token refresh against the back-end, plus the
//! role-aware [`Session`] handed to the rest of the app.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  login(email, senha)                                                   │
//! │     │ POST /auth/login                                                 │
//! │     ▼                                                                   │
//! │  store token + user ──► set bearer ──► Session { token, user }         │
//! │     │                                                                   │
//! │     │   (app restart) restore() ── token AND user stored? ──► Session  │
//! │     │                                                                   │
//! │     ├── refresh()   POST /auth/refresh ──► new token stored            │
//! │     │                                                                   │
//! │     ├── any 401     handle_unauthorized() ──► local data cleared       │
//! │     │                                                                   │
//! │     └── logout()    POST /auth/logout (errors ignored)                 │
//! │                      └── local data ALWAYS cleared                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use loteria_core::access::{self, Action, Resource, Role};
use loteria_core::types::{LoginResponse, TokenResponse, User};
use loteria_core::validation::validate_credentials;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiRequest};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::KeyValueStore;

// =============================================================================
// Session
// =============================================================================

/// An authenticated user and their token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }

    /// True when this user's role allows `action` on `resource`.
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        access::can(self.role(), resource, action)
    }

    /// Like [`can`](Self::can) but returns [`ClientError::Forbidden`] on denial.
    pub fn require(&self, resource: Resource, action: Action) -> ClientResult<()> {
        if self.can(resource, action) {
            return Ok(());
        }

        Err(ClientError::Forbidden {
            detail: format!(
                "{} não pode executar '{}' em '{}'",
                self.role().display_name(),
                action,
                resource
            ),
        })
    }
}

// =============================================================================
// Session Manager
// =============================================================================

/// Owns the API client and the credential store.
///
/// Every call made through [`send`](Self::send) applies the 401 rule.
pub struct SessionManager {
    api: Arc<dyn ApiClient>,
    store: Arc<dyn KeyValueStore>,
    token_key: String,
    user_key: String,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn ApiClient>, store: Arc<dyn KeyValueStore>, config: &ClientConfig) -> Self {
        SessionManager {
            api,
            store,
            token_key: config.token_storage_key.clone(),
            user_key: config.user_storage_key.clone(),
            current: RwLock::new(None),
        }
    }

    /// Logs in and persists the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let credentials = validate_credentials(email, password)?;
        let request = ApiRequest::post("/auth/login").json(&credentials)?;
        let response: LoginResponse = serde_json::from_value(self.api.send(request).await?)?;

        self.store.set(&self.token_key, &response.token).await?;
        self.store
            .set(&self.user_key, &serde_json::to_string(&response.user)?)
            .await?;
        self.api.set_token(Some(response.token.clone())).await;

        let session = Session {
            token: response.token,
            user: response.user,
        };
        *self.current.write().await = Some(session.clone());

        info!(user_id = %session.user.id, role = %session.role(), "Logged in");
        Ok(session)
    }

    /// Logs out. Back-end failures are logged and ignored; local data is
    /// always cleared.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Err(e) = self.api.send(ApiRequest::post("/auth/logout")).await {
            warn!(error = %e, "Back-end logout failed, clearing local session anyway");
        }

        self.clear_local().await;
        info!("Logged out");
        Ok(())
    }

    /// Restores a stored session.
    ///
    /// Returns `None` unless both the token and a parseable user are stored.
    pub async fn restore(&self) -> Option<Session> {
        let token = self.read_key(&self.token_key).await?;
        let user_json = self.read_key(&self.user_key).await?;

        let user: User = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Stored user is unreadable, ignoring stored session");
                return None;
            }
        };

        self.api.set_token(Some(token.clone())).await;
        let session = Session { token, user };
        *self.current.write().await = Some(session.clone());

        debug!(user_id = %session.user.id, "Session restored");
        Some(session)
    }

    /// Exchanges the current token for a new one.
    pub async fn refresh(&self) -> ClientResult<String> {
        self.require_session().await?;

        let response: TokenResponse = self.fetch(ApiRequest::post("/auth/refresh")).await?;
        self.store.set(&self.token_key, &response.token).await?;
        self.api.set_token(Some(response.token.clone())).await;

        if let Some(session) = self.current.write().await.as_mut() {
            session.token = response.token.clone();
        }

        debug!("Token refreshed");
        Ok(response.token)
    }

    /// The 401 rule: drop the stored token and user.
    pub async fn handle_unauthorized(&self) {
        warn!("Back-end rejected the token, clearing session");
        self.clear_local().await;
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// The current session or [`ClientError::NotAuthenticated`].
    pub async fn require_session(&self) -> ClientResult<Session> {
        self.current().await.ok_or(ClientError::NotAuthenticated)
    }

    /// Checks the current session's role before a call.
    pub async fn authorize(&self, resource: Resource, action: Action) -> ClientResult<Session> {
        let session = self.require_session().await?;
        session.require(resource, action)?;
        Ok(session)
    }

    /// Sends a request; a 401 clears the local session.
    pub async fn send(&self, request: ApiRequest) -> ClientResult<Value> {
        match self.api.send(request).await {
            Err(ClientError::Unauthorized) => {
                self.handle_unauthorized().await;
                Err(ClientError::Unauthorized)
            }
            other => other,
        }
    }

    /// [`send`](Self::send) and decode the body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        Ok(serde_json::from_value(self.send(request).await?)?)
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session store");
                None
            }
        }
    }

    async fn clear_local(&self) {
        for key in [&self.token_key, &self.user_key] {
            if let Err(e) = self.store.remove(key).await {
                warn!(key = %key, error = %e, "Failed to clear session store");
            }
        }
        self.api.set_token(None).await;
        *self.current.write().await = None;
    }
}
