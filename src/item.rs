use serde::{Deserialize, Serialize};

/// The single persisted entity, keyed by its caller-supplied `id`.
///
/// Only these three fields are recognized: deserialization drops any extra
/// payload fields, and absent `name`/`price` stay absent (`None`) rather than
/// being defaulted. A put always replaces the stored item wholesale with
/// whatever the caller supplied, including absent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Item {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            price: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}
