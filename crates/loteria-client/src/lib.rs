//! # loteria-client: Back-end Access for Loteria360
//!
//! Everything the point-of-sale front-end needs beyond the pure rules in
//! `loteria-core`: configuration, REST transport, the session lifecycle
//! and typed services for each endpoint.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  SessionManager (token + user)                   │  │
//! │  │                                                                  │  │
//! │  │  login / logout / restore / refresh                              │  │
//! │  │  authorize(resource, action) ── loteria_core::access             │  │
//! │  │  401 → credentials cleared                                       │  │
//! │  └──────────────┬──────────────────────────────┬────────────────────┘  │
//! │                 │                              │                        │
//! │                 ▼                              ▼                        │
//! │  ┌─────────────────────────┐      ┌──────────────────────────────┐     │
//! │  │  dyn ApiClient          │      │  dyn KeyValueStore           │     │
//! │  │  HttpApiClient (reqwest)│      │  MemoryStore                 │     │
//! │  └─────────────────────────┘      └──────────────────────────────┘     │
//! │                                                                         │
//! │  services: caixas · contagem · vendas · clientes · jogos · bolões ·    │
//! │            dashboard                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Request type, `ApiClient` capability, `reqwest` client
//! - [`config`] - Environment presets, TOML file, env overrides
//! - [`error`] - Client error types
//! - [`services`] - Typed endpoint wrappers
//! - [`session`] - Login state and access checks
//! - [`storage`] - Token/user persistence

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiRequest, HttpApiClient, Method, PageRequest};
pub use config::{ClientConfig, Environment, LogLevel};
pub use error::{ClientError, ClientResult};
pub use services::{
    CashBoxService, CashCountService, ClientService, DashboardService, GameService, PoolService,
    SaleService,
};
pub use session::{Session, SessionManager};
pub use storage::{KeyValueStore, MemoryStore};
