//! Asset units and their detail views.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{decode_listing, AmsClient};
use crate::codec::format_date;
use crate::error::{AmsError, AmsResult};
use crate::models::{Model, Portfolio, Product, SettlementInfo};
use crate::proxy::RemoteMap;

/// An asset unit: the top-level container portfolios and accounts hang off.
///
/// The listing only carries id and name; portfolios, product, and the
/// write-only cash-flow/settlement feeds all go through the unit's detail
/// endpoint on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetUnit {
    pub id: String,
    pub name: String,
    #[serde(skip)]
    client: Option<AmsClient>,
}

impl AssetUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            client: None,
        }
    }

    /// Portfolios of this unit, keyed by portfolio id. Read-only.
    pub fn portfolios(&self) -> RemoteMap<String, Portfolio> {
        let unit = self.clone();
        RemoteMap::new().with_fetch(move || {
            let detail = unit.detail()?;
            decode_listing(unit.bound()?, &detail, "portfolios", "id")
        })
    }

    /// Product this unit belongs to, when the detail view carries one.
    pub fn product(&self) -> AmsResult<Option<Product>> {
        match self.detail()?.get("product") {
            Some(doc) if !doc.is_null() => Ok(Some(Product::from_doc(doc.clone(), None)?)),
            _ => Ok(None),
        }
    }

    /// Cash in/out history, keyed by date. Append-only: batches post as one
    /// `cash_in_outs` document.
    pub fn cash_in_outs(&self) -> RemoteMap<NaiveDate, f64> {
        let client = self.client.clone();
        let unit_id = self.id.clone();
        RemoteMap::new().with_extend(move |flows: &BTreeMap<NaiveDate, f64>| {
            let client = require_client(&client)?;
            let entries: Vec<Value> = flows
                .iter()
                .map(|(date, amount)| json!({"date": format_date(*date), "amount": amount}))
                .collect();
            client.request_json(
                Method::POST,
                &format!("/asset_units/{}/cash_in_outs", urlencoding::encode(&unit_id)),
                true,
                Some(&json!({ "cash_in_outs": entries })),
            )?;
            Ok(())
        })
    }

    /// Settlement snapshots, keyed by settlement date. Append-only.
    pub fn settlement_info(&self) -> RemoteMap<NaiveDate, SettlementInfo> {
        let client = self.client.clone();
        RemoteMap::new().with_extend(move |snapshots: &BTreeMap<NaiveDate, SettlementInfo>| {
            let client = require_client(&client)?;
            let docs = snapshots
                .values()
                .map(Model::to_doc)
                .collect::<AmsResult<Vec<_>>>()?;
            client.request_json(
                Method::POST,
                "/settlement_info",
                true,
                Some(&json!({ "settlement_info": docs })),
            )?;
            Ok(())
        })
    }

    /// Fetch the unit's detail document.
    fn detail(&self) -> AmsResult<Value> {
        let body = self.bound()?.request_json(
            Method::GET,
            &format!("/asset_units/{}", urlencoding::encode(&self.id)),
            true,
            None,
        )?;
        body.get("asset_unit")
            .cloned()
            .ok_or_else(|| AmsError::decode("response is missing the \"asset_unit\" document"))
    }

    fn bound(&self) -> AmsResult<&AmsClient> {
        require_client(&self.client)
    }
}

fn require_client(client: &Option<AmsClient>) -> AmsResult<&AmsClient> {
    client.as_ref().ok_or_else(|| {
        AmsError::Validation("asset unit is not bound to a client".to_string())
    })
}

impl PartialEq for AssetUnit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for AssetUnit {}

impl Model for AssetUnit {
    fn bind(&mut self, client: &AmsClient) {
        self.client = Some(client.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let doc = serde_json::json!({"id": "au-9", "name": "Unit Nine"});
        let unit = AssetUnit::from_doc(doc.clone(), None).unwrap();
        assert_eq!(unit, AssetUnit::new("au-9", "Unit Nine"));
        assert_eq!(unit.to_doc().unwrap(), doc);
    }

    #[test]
    fn test_unbound_unit_fails_validation_before_any_call() {
        let unit = AssetUnit::new("au-9", "Unit Nine");
        assert!(matches!(unit.product(), Err(AmsError::Validation(_))));
        assert!(matches!(
            unit.portfolios().fetch(),
            Err(AmsError::Validation(_))
        ));
        let mut flows = BTreeMap::new();
        flows.insert(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(), 1000.0);
        assert!(matches!(
            unit.cash_in_outs().extend(flows),
            Err(AmsError::Validation(_))
        ));
    }

    #[test]
    fn test_cash_in_outs_is_append_only() {
        let unit = AssetUnit::new("au-9", "Unit Nine");
        let flows = unit.cash_in_outs();
        assert!(matches!(
            flows.fetch(),
            Err(AmsError::NotSupported { operation: "fetch" })
        ));
        assert!(matches!(
            flows.remove(&NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()),
            Err(AmsError::NotSupported { operation: "remove" })
        ));
    }
}
