//! Broker records.

use serde::{Deserialize, Serialize};

use crate::models::Model;

/// A broker the service can route accounts through.
///
/// Broker listings are read-only; the frontend/auth fields are only present
/// on views where the caller is entitled to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    pub id: String,
    pub name: String,
    /// Counterparty broker identifier used by trading frontends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_id: Option<String>,
    /// Trade frontend addresses, in failover order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trade_frontend_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_product_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl Broker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            broker_id: None,
            trade_frontend_urls: Vec::new(),
            user_product_info: None,
            auth_code: None,
            app_id: None,
        }
    }
}

impl Model for Broker {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_document_round_trip() {
        let doc = serde_json::json!({
            "id": "b-1",
            "name": "North Gate Futures",
            "broker_id": "9090",
            "trade_frontend_urls": ["tcp://fe1.example.com:4101", "tcp://fe2.example.com:4101"],
            "user_product_info": "amsclient",
            "auth_code": "K8C0000000000000",
            "app_id": "ams_v3"
        });
        let broker = Broker::from_doc(doc.clone(), None).unwrap();
        assert_eq!(broker.trade_frontend_urls.len(), 2);
        assert_eq!(broker.to_doc().unwrap(), doc);
    }

    #[test]
    fn test_broker_decodes_bare_reference() {
        let doc = serde_json::json!({"id": "b-1", "name": "North Gate Futures"});
        let broker = Broker::from_doc(doc, None).unwrap();
        assert_eq!(broker, Broker::new("b-1", "North Gate Futures"));
        assert!(broker.trade_frontend_urls.is_empty());
    }
}
