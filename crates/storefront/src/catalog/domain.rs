use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog products (`prod-17`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Immutable catalog record. Labels are free text and compared as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub sport: String,
    pub category: String,
    pub price: f64,
    pub rating: u8,
    pub reviews: u32,
}

/// Sorted, de-duplicated label lists backing the sidebar checkboxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogFacets {
    pub sports: Vec<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}
