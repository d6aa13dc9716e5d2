//! Typed domain model for AMS resources.
//!
//! Each entity is a plain record deriving its wire conversion; the [`Model`]
//! trait adds document conversion plus client binding so decoded entities can
//! issue follow-up calls through the owning [`AmsClient`](crate::client::AmsClient).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::AmsClient;
use crate::error::AmsResult;

pub mod account;
pub mod asset_unit;
pub mod broker;
pub mod portfolio;
pub mod product;
pub mod settlement;
pub mod trade;

pub use account::Account;
pub use asset_unit::AssetUnit;
pub use broker::Broker;
pub use portfolio::Portfolio;
pub use product::Product;
pub use settlement::{Direction, Position, SettlementInfo};
pub use trade::{Side, Trade};

/// Bidirectional conversion between a typed record and its wire document.
///
/// `to_doc` and `from_doc` recurse through nested records and sequences of
/// records. Unknown keys in an inbound document are ignored; fields the
/// service omitted decode to `None`. The client handle is never part of the
/// document.
pub trait Model: Serialize + DeserializeOwned {
    /// Convert to a wire document.
    fn to_doc(&self) -> AmsResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a wire document and bind `client` into the result so the
    /// entity (and its nested entities) can reach the network.
    fn from_doc(doc: Value, client: Option<&AmsClient>) -> AmsResult<Self> {
        let mut model: Self = serde_json::from_value(doc)?;
        if let Some(client) = client {
            model.bind(client);
        }
        Ok(model)
    }

    /// Attach the non-owning client handle. Records that never call back into
    /// the network keep the default no-op.
    fn bind(&mut self, _client: &AmsClient) {}
}
