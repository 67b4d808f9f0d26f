//! # loteria-core: Pure Business Logic for Loteria360
//!
//! This crate is the **heart** of Loteria360. It contains the business rules
//! of the lottery point-of-sale front-end as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Loteria360 Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front-end (screens, forms, menu)                │   │
//! │  │   Login ──► Drawer Menu ──► Count Form ──► Sale Form           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ loteria-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │cash_count │  │  access   │  │ validation│  │   │
//! │  │   │   Money   │  │  Totals   │  │  Role     │  │  rules    │  │   │
//! │  │   │  parsing  │  │  Payload  │  │  Menu     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO GLOBAL SESSION • PURE FUNCTIONS     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             loteria-client (REST API, session, config)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cash_count`] - Denomination tables, count totals, submission payload
//! - [`access`] - Role-based permission table and navigation filtering
//! - [`sale`] - Sale form draft and its total
//! - [`types`] - Wire DTOs exchanged with the back-end
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use loteria_core::cash_count::{compute_totals, DenominationSet, DenominationTable};
//! use loteria_core::access::{can, Action, Resource, Role};
//!
//! let mut set = DenominationSet::new(DenominationTable::brl());
//! set.set_raw("1", "3").unwrap();
//! set.set_raw("0.50", "2").unwrap();
//! set.set_raw("0.05", "1").unwrap();
//!
//! let totals = compute_totals(&set);
//! assert_eq!(totals.total_coins.cents(), 405); // R$ 4,05 exactly
//!
//! assert!(can(Role::Seller, Resource::Sales, Action::Create));
//! assert!(!can(Role::Seller, Resource::Users, Action::Read));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cash_count;
pub mod error;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Action, ActionSet, NavigationItem, PermissionTable, Resource, Role};
pub use cash_count::{CashCountRequest, CountTotals, Denomination, DenominationSet, DenominationTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for paginated listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// ISO 4217 code of the currency the standard denomination table describes.
pub const DEFAULT_CURRENCY: &str = "BRL";
