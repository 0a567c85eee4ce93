use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Category, Warmth};
use crate::errors::DomainError;

pub const DEFAULT_BUDGET_DOLLARS: i64 = 400;
pub const DEFAULT_DELIVERY_DAYS: u32 = 5;
pub const DEFAULT_SIZE: &str = "M";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Skiing,
    Party,
    Hackathon,
    #[default]
    Custom,
}

impl std::str::FromStr for Scenario {
    type Err = std::convert::Infallible;

    /// Unknown tags (an LLM can invent new ones) fall back to `Custom`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "skiing" => Self::Skiing,
            "party" => Self::Party,
            "hackathon" => Self::Hackathon,
            _ => Self::Custom,
        })
    }
}

impl<'de> Deserialize<'de> for Scenario {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(tag.parse().unwrap_or_default())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmth: Option<Warmth>,
    #[serde(default)]
    pub waterproof: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Normalized user intent for one shopping request.
///
/// Produced by the brief parsers in `outfitter-agent` and consumed read-only
/// by one discovery pass. Missing fields deserialize to the same defaults the
/// parsers apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShoppingBrief {
    #[serde(default = "default_budget")]
    pub budget: Decimal,
    #[serde(default = "default_delivery_days")]
    pub delivery_days: u32,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default = "default_items")]
    pub items: Vec<Category>,
    #[serde(default)]
    pub scenario: Scenario,
}

impl Default for ShoppingBrief {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            delivery_days: DEFAULT_DELIVERY_DAYS,
            size: DEFAULT_SIZE.to_string(),
            preferences: Preferences::default(),
            items: default_items(),
            scenario: Scenario::Custom,
        }
    }
}

impl ShoppingBrief {
    /// Rejects briefs whose budget or deadline would make the scoring ratios
    /// divide by zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.budget <= Decimal::ZERO {
            return Err(DomainError::InvalidBrief("budget must be greater than zero".to_owned()));
        }
        if self.delivery_days == 0 {
            return Err(DomainError::InvalidBrief(
                "delivery_days must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

pub fn default_budget() -> Decimal {
    Decimal::from(DEFAULT_BUDGET_DOLLARS)
}

fn default_delivery_days() -> u32 {
    DEFAULT_DELIVERY_DAYS
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

/// Item set used when a request names no recognizable items.
pub fn default_items() -> Vec<Category> {
    ["jacket", "pants", "gloves", "goggles"].into_iter().map(Category::new).collect()
}
