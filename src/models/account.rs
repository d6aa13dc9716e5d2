//! Trading accounts and their portfolio binding.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::AmsClient;
use crate::error::{AmsError, AmsResult};
use crate::models::{AssetUnit, Broker, Model, Portfolio, Product};

/// A trading account registered with the service.
///
/// `portfolio` is deliberately not a public field: reassigning it PATCHes the
/// remote account first, so all writes go through [`set_portfolio`](Self::set_portfolio).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Display name.
    pub name: String,
    /// External account identifier; the key under which the service stores
    /// this account.
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<Broker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    portfolio: Option<Portfolio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_unit: Option<AssetUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip)]
    client: Option<AmsClient>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        account: impl Into<String>,
        broker: Broker,
        portfolio: Portfolio,
        asset_unit: AssetUnit,
    ) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            broker: Some(broker),
            portfolio: Some(portfolio),
            asset_unit: Some(asset_unit),
            product: None,
            client: None,
        }
    }

    /// Portfolio this account currently books into.
    pub fn portfolio(&self) -> Option<&Portfolio> {
        self.portfolio.as_ref()
    }

    /// Re-bind this account to another portfolio.
    ///
    /// PATCHes the remote account first and only stores the new value once
    /// the service accepted it; on any error the local field is untouched.
    /// Fails with [`AmsError::Validation`] — without issuing a call — when
    /// the account is not bound to a client.
    pub fn set_portfolio(&mut self, portfolio: Portfolio) -> AmsResult<()> {
        let client = self.client.as_ref().ok_or_else(|| {
            AmsError::Validation(
                "account is not bound to a client; portfolio cannot be updated".to_string(),
            )
        })?;
        client.request_json(
            Method::PATCH,
            &format!("/accounts/{}", urlencoding::encode(&self.account)),
            true,
            Some(&json!({"account": {"portfolio": portfolio.id}})),
        )?;
        self.portfolio = Some(portfolio);
        Ok(())
    }

    /// The nested-reference document `POST /accounts` expects.
    pub(crate) fn reference_doc(&self) -> AmsResult<serde_json::Value> {
        let broker = self.require_ref(self.broker.as_ref().map(|b| &b.id), "broker")?;
        let asset_unit = self.require_ref(self.asset_unit.as_ref().map(|u| &u.id), "asset_unit")?;
        let portfolio = self.require_ref(self.portfolio.as_ref().map(|p| &p.id), "portfolio")?;
        Ok(json!({
            "account": {
                "name": self.name,
                "account": self.account,
                "broker": broker,
                "asset_unit": asset_unit,
                "portfolio": portfolio,
            }
        }))
    }

    fn require_ref<'a>(&self, id: Option<&'a String>, field: &str) -> AmsResult<&'a String> {
        id.ok_or_else(|| {
            AmsError::Validation(format!(
                "account {:?} is missing its {field} reference",
                self.account
            ))
        })
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.account == other.account
            && self.broker == other.broker
            && self.portfolio == other.portfolio
            && self.asset_unit == other.asset_unit
            && self.product == other.product
    }
}

impl Model for Account {
    fn bind(&mut self, client: &AmsClient) {
        self.client = Some(client.clone());
        if let Some(broker) = &mut self.broker {
            broker.bind(client);
        }
        if let Some(portfolio) = &mut self.portfolio {
            portfolio.bind(client);
        }
        if let Some(asset_unit) = &mut self.asset_unit {
            asset_unit.bind(client);
        }
        if let Some(product) = &mut self.product {
            product.bind(client);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account::new(
            "CTA main",
            "880021",
            Broker::new("b-1", "North Gate Futures"),
            Portfolio::new("pf-1", "Alpha"),
            AssetUnit::new("au-9", "Unit Nine"),
        )
    }

    #[test]
    fn test_document_round_trip_with_nested_entities() {
        let doc = serde_json::json!({
            "name": "CTA main",
            "account": "880021",
            "broker": {"id": "b-1", "name": "North Gate Futures"},
            "portfolio": {"id": "pf-1", "name": "Alpha"},
            "asset_unit": {"id": "au-9", "name": "Unit Nine"},
            "product": {"id": "p-7", "name": "Macro Fund No.3"}
        });
        let account = Account::from_doc(doc.clone(), None).unwrap();
        assert_eq!(account.broker.as_ref().unwrap().id, "b-1");
        assert_eq!(account.portfolio().unwrap().id, "pf-1");
        assert_eq!(account.to_doc().unwrap(), doc);

        let again = Account::from_doc(account.to_doc().unwrap(), None).unwrap();
        assert_eq!(again, account);
    }

    #[test]
    fn test_document_without_nested_references() {
        let doc = serde_json::json!({"name": "CTA main", "account": "880021"});
        let account = Account::from_doc(doc, None).unwrap();
        assert!(account.broker.is_none());
        assert!(account.portfolio().is_none());
    }

    #[test]
    fn test_set_portfolio_unbound_fails_and_leaves_field_alone() {
        let mut account = sample_account();
        let before = account.portfolio().cloned();
        let result = account.set_portfolio(Portfolio::new("pf-2", "Beta"));
        assert!(matches!(result, Err(AmsError::Validation(_))));
        assert_eq!(account.portfolio().cloned(), before);
    }

    #[test]
    fn test_reference_doc_flattens_nested_ids() {
        let doc = sample_account().reference_doc().unwrap();
        assert_eq!(
            doc,
            serde_json::json!({
                "account": {
                    "name": "CTA main",
                    "account": "880021",
                    "broker": "b-1",
                    "asset_unit": "au-9",
                    "portfolio": "pf-1",
                }
            })
        );
    }

    #[test]
    fn test_reference_doc_requires_all_references() {
        let mut account = sample_account();
        account.broker = None;
        match account.reference_doc() {
            Err(AmsError::Validation(message)) => assert!(message.contains("broker")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
