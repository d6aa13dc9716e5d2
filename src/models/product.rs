//! Product metadata.

use serde::{Deserialize, Serialize};

use crate::models::Model;

/// A product an asset unit or account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Filing/case number; not present on every resource view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_num: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            case_num: None,
        }
    }
}

impl Model for Product {}
