//! # Client Error Types
//!
//! Error types for API, session and configuration operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   Back-end      │  │     Session             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http           │  │  Unauthorized   │  │  NotAuthenticated       │ │
//! │  │  Serialization  │  │  Forbidden      │  │  Storage                │ │
//! │  │                 │  │  Api            │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Configuration  │  │     Domain      │                              │
//! │  │  InvalidConfig  │  │  Core(CoreError)│                              │
//! │  │  ConfigLoad     │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use loteria_core::types::FieldError;
use loteria_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure outside the pure core.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A body could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // =========================================================================
    // Back-end Errors
    // =========================================================================
    /// 401: the token is missing, expired or revoked.
    ///
    /// Stored credentials are cleared when this is seen.
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// 403: the back-end refused the action for this user.
    #[error("Acesso negado: {detail}")]
    Forbidden { detail: String },

    /// Any other non-2xx status.
    #[error("API error {status}: {detail}")]
    Api {
        status: u16,
        detail: String,
        field_errors: Vec<FieldError>,
    },

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// An authenticated call was attempted without a session.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The token/user store failed.
    ///
    /// [`KeyValueStore`](crate::KeyValueStore) implementations backed by a
    /// keychain or disk report their failures with this variant; the
    /// session layer propagates it unchanged.
    #[error("Storage error: {0}")]
    Storage(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A core rule rejected the input before any request was made.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// True for errors that end the session (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// True for 5xx responses and transport failures.
    pub fn is_server_error(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => *status >= 500,
            ClientError::Http(_) => true,
            _ => false,
        }
    }

    /// Message suitable for a toast, mirroring what the back-end said.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Forbidden { detail } => detail.clone(),
            ClientError::Api { detail, .. } if !detail.is_empty() => detail.clone(),
            ClientError::Api { status, .. } if *status >= 500 => {
                "Erro interno do servidor. Tente novamente mais tarde.".to_string()
            }
            ClientError::Unauthorized => "Sessão expirada. Faça login novamente.".to_string(),
            ClientError::Core(err) => err.to_string(),
            _ => "Ocorreu um erro inesperado".to_string(),
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(err.into())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}
