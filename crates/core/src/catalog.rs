//! Process-wide immutable product and retailer data.
//!
//! Both structures are built once at startup and shared behind `Arc`; nothing
//! mutates them afterwards. The built-in data mirrors the demo storefront:
//! four retailers and five categories of winter gear.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::domain::product::{Category, Product, ProductId, SafetyRating, Warmth};
use crate::domain::retailer::{Retailer, RetailerKey};
use crate::errors::DomainError;

#[derive(Clone, Debug, Default)]
pub struct RetailerDirectory {
    retailers: BTreeMap<RetailerKey, Retailer>,
}

impl RetailerDirectory {
    pub fn new(retailers: Vec<Retailer>) -> Self {
        Self {
            retailers: retailers
                .into_iter()
                .map(|retailer| (retailer.key.clone(), retailer))
                .collect(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            retailer("amazon", "Amazon", 2),
            retailer("rei", "REI", 3),
            retailer("backcountry", "Backcountry", 4),
            retailer("evo", "Evo", 3),
        ])
    }

    pub fn get(&self, key: &RetailerKey) -> Option<&Retailer> {
        self.retailers.get(key)
    }

    /// Display name for a retailer key, falling back to the raw key when the
    /// key is unknown so summaries degrade instead of failing.
    pub fn display_name(&self, key: &RetailerKey) -> String {
        self.get(key).map(|retailer| retailer.name.clone()).unwrap_or_else(|| key.0.clone())
    }

    pub fn as_map(&self) -> &BTreeMap<RetailerKey, Retailer> {
        &self.retailers
    }

    pub fn len(&self) -> usize {
        self.retailers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retailers.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: BTreeMap<Category, Vec<Product>>,
}

impl Catalog {
    pub fn new(products: BTreeMap<Category, Vec<Product>>) -> Self {
        Self { products }
    }

    pub fn builtin() -> Self {
        let mut products = BTreeMap::new();
        products.insert(
            Category::new("jacket"),
            vec![
                apparel("j1", "Arc'teryx Rush Jacket", 189, "rei", 4.8, Warmth::High, "🧥"),
                apparel(
                    "j2",
                    "Patagonia Powder Bowl Jacket",
                    179,
                    "backcountry",
                    4.7,
                    Warmth::High,
                    "🧥",
                ),
                apparel(
                    "j3",
                    "North Face Freedom Insulated",
                    159,
                    "amazon",
                    4.6,
                    Warmth::Medium,
                    "🧥",
                ),
                apparel("j4", "Columbia Wildside Jacket", 129, "evo", 4.5, Warmth::Medium, "🧥"),
            ],
        );
        products.insert(
            Category::new("pants"),
            vec![
                apparel("p1", "Arc'teryx Sabre AR Pants", 149, "rei", 4.8, Warmth::High, "👖"),
                apparel(
                    "p2",
                    "Patagonia Snowshot Pants",
                    139,
                    "backcountry",
                    4.7,
                    Warmth::High,
                    "👖",
                ),
                apparel(
                    "p3",
                    "North Face Freedom Insulated Pants",
                    119,
                    "amazon",
                    4.6,
                    Warmth::Medium,
                    "👖",
                ),
                apparel("p4", "Burton Cargo Pants", 99, "evo", 4.5, Warmth::Medium, "👖"),
            ],
        );
        products.insert(
            Category::new("gloves"),
            vec![
                apparel("g1", "Black Diamond Guide Gloves", 69, "rei", 4.7, Warmth::High, "🧤"),
                apparel(
                    "g2",
                    "Hestra Army Leather Heli Ski",
                    79,
                    "backcountry",
                    4.9,
                    Warmth::High,
                    "🧤",
                ),
                apparel(
                    "g3",
                    "The North Face Montana Gloves",
                    49,
                    "amazon",
                    4.5,
                    Warmth::Medium,
                    "🧤",
                ),
                apparel("g4", "Burton Gore-Tex Gloves", 59, "evo", 4.6, Warmth::Medium, "🧤"),
            ],
        );
        products.insert(
            Category::new("goggles"),
            vec![
                eyewear("go1", "Smith I/O Mag Goggles", 89, "rei", 4.8, "interchangeable", "🥽"),
                eyewear(
                    "go2",
                    "Oakley Flight Deck Goggles",
                    99,
                    "backcountry",
                    4.7,
                    "prizm",
                    "🥽",
                ),
                eyewear("go3", "Anon M4 Goggles", 79, "amazon", 4.6, "magnetic", "🥽"),
                eyewear("go4", "Dragon NFX2 Goggles", 69, "evo", 4.5, "frameless", "🥽"),
            ],
        );
        products.insert(
            Category::new("helmet"),
            vec![
                headgear("h1", "Smith Vantage MIPS Helmet", 99, "rei", 4.8, SafetyRating::Mips, "⛑️"),
                headgear(
                    "h2",
                    "Giro Range MIPS Helmet",
                    89,
                    "backcountry",
                    4.7,
                    SafetyRating::Mips,
                    "⛑️",
                ),
                headgear("h3", "POC Fornix Helmet", 79, "amazon", 4.6, SafetyRating::Standard, "⛑️"),
                headgear("h4", "Anon Raider Helmet", 69, "evo", 4.5, SafetyRating::Standard, "⛑️"),
            ],
        );
        Self { products }
    }

    /// Candidate products for a category, or `None` when the catalog does not
    /// carry the category. Lookups are canonical (trimmed, lowercased).
    pub fn candidates(&self, category: &Category) -> Option<&[Product]> {
        self.products.get(&category.canonical()).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.products.keys()
    }

    pub fn product_count(&self) -> usize {
        self.products.values().map(Vec::len).sum()
    }

    /// Startup integrity check: every product must reference a known retailer,
    /// carry a rating on the 0-5 scale, and a non-negative price.
    pub fn validate(&self, directory: &RetailerDirectory) -> Result<(), DomainError> {
        for (category, candidates) in &self.products {
            for product in candidates {
                if directory.get(&product.retailer).is_none() {
                    return Err(DomainError::InvariantViolation(format!(
                        "product {} in {category} references unknown retailer {}",
                        product.id.0, product.retailer
                    )));
                }
                if !(0.0..=5.0).contains(&product.rating) {
                    return Err(DomainError::InvariantViolation(format!(
                        "product {} in {category} has rating {} outside 0-5",
                        product.id.0, product.rating
                    )));
                }
                if product.price < Decimal::ZERO {
                    return Err(DomainError::InvariantViolation(format!(
                        "product {} in {category} has negative price",
                        product.id.0
                    )));
                }
            }
        }
        Ok(())
    }
}

fn retailer(key: &str, name: &str, base_delivery_days: u32) -> Retailer {
    Retailer { key: RetailerKey(key.to_string()), name: name.to_string(), base_delivery_days }
}

fn shell(id: &str, name: &str, price: i64, retailer: &str, rating: f64, glyph: &str) -> Product {
    Product {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        price: Decimal::from(price),
        retailer: RetailerKey(retailer.to_string()),
        rating,
        waterproof: None,
        warmth: None,
        safety: None,
        features: BTreeSet::new(),
        glyph: glyph.to_string(),
    }
}

fn apparel(
    id: &str,
    name: &str,
    price: i64,
    retailer: &str,
    rating: f64,
    warmth: Warmth,
    glyph: &str,
) -> Product {
    Product {
        waterproof: Some(true),
        warmth: Some(warmth),
        ..shell(id, name, price, retailer, rating, glyph)
    }
}

fn eyewear(
    id: &str,
    name: &str,
    price: i64,
    retailer: &str,
    rating: f64,
    feature: &str,
    glyph: &str,
) -> Product {
    Product {
        features: BTreeSet::from([feature.to_string()]),
        ..shell(id, name, price, retailer, rating, glyph)
    }
}

fn headgear(
    id: &str,
    name: &str,
    price: i64,
    retailer: &str,
    rating: f64,
    safety: SafetyRating,
    glyph: &str,
) -> Product {
    Product { safety: Some(safety), ..shell(id, name, price, retailer, rating, glyph) }
}
