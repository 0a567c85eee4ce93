use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::retailer::RetailerKey;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// An item type such as jacket, pants, gloves, goggles, or helmet.
///
/// Categories arrive from parsed briefs and from clients, so they stay open
/// strings rather than a closed enum; unknown categories are skipped during
/// discovery instead of rejected.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Category(pub String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_ascii_lowercase())
    }

    /// Canonical form used for catalog lookups.
    pub fn canonical(&self) -> Category {
        Category(self.0.trim().to_ascii_lowercase())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Warmth {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyRating {
    #[serde(rename = "MIPS")]
    Mips,
    Standard,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub retailer: RetailerKey,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waterproof: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmth: Option<Warmth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyRating>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub features: BTreeSet<String>,
    pub glyph: String,
}
