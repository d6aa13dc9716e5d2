//! # AMS Rust SDK
//!
//! A Rust SDK for the AMS asset-management REST service.
//!
//! ## Modules
//!
//! - [`client`]: the authenticated [`AmsClient`](client::AmsClient) and its
//!   resource views
//! - [`models`]: typed domain entities with document conversion
//! - [`proxy`]: the lazy remote-mapping view ([`RemoteMap`](proxy::RemoteMap))
//!
//! Plus the supporting modules [`auth`], [`codec`], [`error`], [`network`],
//! and [`retry`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ams_sdk::prelude::*;
//! use std::collections::BTreeMap;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Log in (or adopt an existing session with AmsClient::with_session).
//!     let client = AmsClient::login("trader", "hunter2")?;
//!
//!     // Resource views are lazy: nothing is fetched until you ask.
//!     for (id, unit) in client.asset_units().fetch()? {
//!         println!("{id}: {}", unit.name);
//!     }
//!
//!     // Mutations serialize back through the same views.
//!     let account = client.accounts().get(&"880021".to_string())?;
//!     let portfolios = account.asset_unit.as_ref().unwrap().portfolios().fetch()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`AmsResult`](error::AmsResult). Transport failures
//! are retried (3 attempts, no delay); a non-2xx response surfaces
//! immediately as [`AmsError::RequestFailed`](error::AmsError::RequestFailed)
//! with the status and body preserved for diagnostics.

// ============================================================================
// MODULES
// ============================================================================

/// Session credentials and the login wire types.
pub mod auth;

/// The authenticated client and its resource views.
pub mod client;

/// Date/datetime wire-format helpers.
pub mod codec;

/// Error taxonomy.
pub mod error;

/// Typed domain entities.
pub mod models;

/// Service URL constants.
pub mod network;

/// Lazy remote-mapping proxy.
pub mod proxy;

/// Transport retry policy.
pub mod retry;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ams_sdk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::Session;
    pub use crate::client::{AmsClient, AmsClientBuilder};
    pub use crate::error::{AmsError, AmsResult};
    pub use crate::models::{
        Account, AssetUnit, Broker, Direction, Model, Portfolio, Position, Product, SettlementInfo,
        Side, Trade,
    };
    pub use crate::network::{API_PREFIX, DEFAULT_SERVER_URL};
    pub use crate::proxy::RemoteMap;
    pub use crate::retry::RetryPolicy;
}
