//! Portfolio records and their trade stream.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::AmsClient;
use crate::error::{AmsError, AmsResult};
use crate::models::{Model, Trade};
use crate::proxy::RemoteMap;

/// A portfolio inside an asset unit.
///
/// Equality compares ids only: two views of the same portfolio are the same
/// portfolio even when one of them is a bare reference without a name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip)]
    client: Option<AmsClient>,
}

impl Portfolio {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            client: None,
        }
    }

    /// Executed trades of this portfolio, keyed by execution id.
    ///
    /// The service only accepts appends here: the mapping carries the
    /// write-many capability and nothing else, and each batch goes out as a
    /// single `trades:append_multi_json` call.
    pub fn trades(&self) -> RemoteMap<String, Trade> {
        let client = self.client.clone();
        let portfolio_id = self.id.clone();
        RemoteMap::new().with_extend(move |trades: &BTreeMap<String, Trade>| {
            let client = bound(&client)?;
            let docs = trades
                .values()
                .map(Model::to_doc)
                .collect::<AmsResult<Vec<_>>>()?;
            client.request_json(
                Method::POST,
                &format!(
                    "/portfolios/{}/trades:append_multi_json",
                    urlencoding::encode(&portfolio_id)
                ),
                true,
                Some(&json!({ "trades": docs })),
            )?;
            Ok(())
        })
    }
}

fn bound(client: &Option<AmsClient>) -> AmsResult<&AmsClient> {
    client.as_ref().ok_or_else(|| {
        AmsError::Validation("portfolio is not bound to a client".to_string())
    })
}

impl PartialEq for Portfolio {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Portfolio {}

impl Model for Portfolio {
    fn bind(&mut self, client: &AmsClient) {
        self.client = Some(client.clone());
    }
}
