//! One discovery pass: rank every requested category, auto-select a cart,
//! and derive the budget, delivery, and retailer summaries.
//!
//! Everything here is a pure function of the brief plus the immutable catalog
//! and retailer directory; the only ambient input is the clock, which is
//! injected through `discover_at` for deterministic tests.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RetailerDirectory};
use crate::domain::brief::ShoppingBrief;
use crate::domain::product::Category;
use crate::domain::retailer::RetailerKey;
use crate::errors::DomainError;
use crate::ranking::{rank_products, RankedProduct};

/// Flat per-retailer shipping heuristic, in dollars.
const SHIPPING_DOLLARS_PER_RETAILER: i64 = 5;

const DELIVERY_DATE_FORMAT: &str = "%B %d, %Y";

/// One selected product per requested category.
pub type Cart = BTreeMap<Category, RankedProduct>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub total: Decimal,
    pub budget: Decimal,
    /// May be negative when the cart runs over budget; callers must handle it.
    pub remaining: Decimal,
    /// May exceed 100.
    pub percentage_used: Decimal,
    pub over_budget: bool,
    pub by_category: BTreeMap<Category, Decimal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDelivery {
    pub days: u32,
    pub date: String,
    pub retailer: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTimeline {
    pub by_item: BTreeMap<Category, ItemDelivery>,
    pub latest_delivery_days: u32,
    pub latest_delivery_date: String,
    pub meets_deadline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerOptimization {
    pub num_retailers: usize,
    pub breakdown: BTreeMap<RetailerKey, Vec<Category>>,
    pub shipping_estimate: Decimal,
}

/// Full result of one discovery pass, shaped for the discover API response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    pub products: BTreeMap<Category, Vec<RankedProduct>>,
    pub auto_cart: Cart,
    pub total: Decimal,
    pub budget_breakdown: BudgetBreakdown,
    pub delivery_timeline: DeliveryTimeline,
    pub retailer_optimization: RetailerOptimization,
}

pub fn discover(
    brief: &ShoppingBrief,
    catalog: &Catalog,
    directory: &RetailerDirectory,
) -> Result<Discovery, DomainError> {
    discover_at(brief, catalog, directory, Utc::now())
}

pub fn discover_at(
    brief: &ShoppingBrief,
    catalog: &Catalog,
    directory: &RetailerDirectory,
    now: DateTime<Utc>,
) -> Result<Discovery, DomainError> {
    brief.validate()?;

    let mut products = BTreeMap::new();
    for category in &brief.items {
        // Categories the catalog does not carry are silently skipped.
        let Some(candidates) = catalog.candidates(category) else {
            continue;
        };
        products.insert(category.canonical(), rank_products(candidates, brief, directory));
    }

    let auto_cart = auto_select_cart(&products);
    let total = cart_total(&auto_cart);
    let budget_breakdown = budget_breakdown(&auto_cart, brief);
    let delivery_timeline = delivery_timeline_at(&auto_cart, brief, directory, now);
    let retailer_optimization = optimize_cart_for_retailers(&auto_cart);

    Ok(Discovery {
        products,
        auto_cart,
        total,
        budget_breakdown,
        delivery_timeline,
        retailer_optimization,
    })
}

/// Picks the top-ranked product of each non-empty category list.
pub fn auto_select_cart(products: &BTreeMap<Category, Vec<RankedProduct>>) -> Cart {
    products
        .iter()
        .filter_map(|(category, ranked)| {
            ranked.first().map(|best| (category.clone(), best.clone()))
        })
        .collect()
}

pub fn cart_total(cart: &Cart) -> Decimal {
    cart.values().map(|item| item.product.price).sum()
}

pub fn budget_breakdown(cart: &Cart, brief: &ShoppingBrief) -> BudgetBreakdown {
    let total = cart_total(cart);
    let percentage_used = if brief.budget.is_zero() {
        Decimal::ZERO
    } else {
        (total / brief.budget * Decimal::from(100)).round_dp(1)
    };

    BudgetBreakdown {
        total,
        budget: brief.budget,
        remaining: brief.budget - total,
        percentage_used,
        over_budget: total > brief.budget,
        by_category: cart
            .iter()
            .map(|(category, item)| (category.clone(), item.product.price))
            .collect(),
    }
}

pub fn delivery_timeline_at(
    cart: &Cart,
    brief: &ShoppingBrief,
    directory: &RetailerDirectory,
    now: DateTime<Utc>,
) -> DeliveryTimeline {
    let mut by_item = BTreeMap::new();
    let mut latest_delivery_days = 0;

    for (category, item) in cart {
        let days = item.delivery_days;
        by_item.insert(
            category.clone(),
            ItemDelivery {
                days,
                date: format_delivery_date(now, days),
                retailer: directory.display_name(&item.product.retailer),
            },
        );
        latest_delivery_days = latest_delivery_days.max(days);
    }

    DeliveryTimeline {
        by_item,
        latest_delivery_days,
        latest_delivery_date: format_delivery_date(now, latest_delivery_days),
        meets_deadline: latest_delivery_days <= brief.delivery_days,
    }
}

pub fn optimize_cart_for_retailers(cart: &Cart) -> RetailerOptimization {
    let mut breakdown: BTreeMap<RetailerKey, Vec<Category>> = BTreeMap::new();
    for (category, item) in cart {
        breakdown.entry(item.product.retailer.clone()).or_default().push(category.clone());
    }

    let num_retailers = breakdown.len();
    RetailerOptimization {
        num_retailers,
        breakdown,
        shipping_estimate: Decimal::from(num_retailers as i64 * SHIPPING_DOLLARS_PER_RETAILER),
    }
}

fn format_delivery_date(now: DateTime<Utc>, days: u32) -> String {
    now.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(now)
        .format(DELIVERY_DATE_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::catalog::{Catalog, RetailerDirectory};
    use crate::domain::brief::{Preferences, ShoppingBrief};
    use crate::domain::product::{Category, Warmth};
    use crate::errors::DomainError;

    use super::{discover_at, Cart};

    fn skiing_brief() -> ShoppingBrief {
        ShoppingBrief {
            budget: Decimal::from(400),
            delivery_days: 5,
            preferences: Preferences {
                warmth: Some(Warmth::High),
                waterproof: true,
                ..Preferences::default()
            },
            items: ["jacket", "pants", "gloves", "goggles", "helmet"]
                .into_iter()
                .map(Category::new)
                .collect(),
            ..ShoppingBrief::default()
        }
    }

    fn fixed_now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).single().expect("valid timestamp")
    }

    #[test]
    fn discovery_selects_one_product_per_requested_category() {
        let discovery = discover_at(
            &skiing_brief(),
            &Catalog::builtin(),
            &RetailerDirectory::builtin(),
            fixed_now(),
        )
        .expect("discovery should succeed");

        assert_eq!(discovery.products.len(), 5);
        assert_eq!(discovery.auto_cart.len(), 5);
        for (category, ranked) in &discovery.products {
            let selected = discovery.auto_cart.get(category).expect("selected product");
            assert_eq!(selected, &ranked[0], "cart must hold the top-ranked candidate");
        }
    }

    #[test]
    fn unknown_categories_are_skipped_not_rejected() {
        let brief = ShoppingBrief {
            items: vec![Category::new("jacket"), Category::new("snowshoes")],
            ..skiing_brief()
        };

        let discovery =
            discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), fixed_now())
                .expect("discovery should succeed");

        assert_eq!(discovery.products.len(), 1);
        assert!(!discovery.auto_cart.contains_key(&Category::new("snowshoes")));
    }

    #[test]
    fn budget_breakdown_is_exact_and_unclamped() {
        let brief = ShoppingBrief {
            budget: Decimal::from(200),
            items: vec![Category::new("jacket"), Category::new("pants")],
            ..skiing_brief()
        };

        let discovery =
            discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), fixed_now())
                .expect("discovery should succeed");

        let breakdown = &discovery.budget_breakdown;
        assert_eq!(breakdown.remaining, breakdown.budget - breakdown.total);
        assert_eq!(breakdown.over_budget, breakdown.total > breakdown.budget);
        if breakdown.over_budget {
            assert!(breakdown.remaining < Decimal::ZERO);
            assert!(breakdown.percentage_used > Decimal::from(100));
        }
        let by_category_total: Decimal = breakdown.by_category.values().copied().sum();
        assert_eq!(by_category_total, breakdown.total);
    }

    #[test]
    fn two_retailer_cart_doubles_the_shipping_estimate() {
        // Under a high budget the cheapest items win their categories; the
        // exact winners matter less than the retailer math staying exact.
        let brief = ShoppingBrief {
            items: vec![Category::new("jacket"), Category::new("pants")],
            preferences: Preferences::default(),
            ..skiing_brief()
        };

        let discovery =
            discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), fixed_now())
                .expect("discovery should succeed");

        let optimization = &discovery.retailer_optimization;
        assert_eq!(
            optimization.shipping_estimate,
            Decimal::from(optimization.num_retailers as i64 * 5)
        );
        let grouped: usize = optimization.breakdown.values().map(Vec::len).sum();
        assert_eq!(grouped, discovery.auto_cart.len());
    }

    #[test]
    fn timeline_tracks_the_slowest_retailer() {
        let discovery = discover_at(
            &skiing_brief(),
            &Catalog::builtin(),
            &RetailerDirectory::builtin(),
            fixed_now(),
        )
        .expect("discovery should succeed");

        let timeline = &discovery.delivery_timeline;
        let max_days =
            timeline.by_item.values().map(|item| item.days).max().expect("non-empty cart");
        assert_eq!(timeline.latest_delivery_days, max_days);
        assert_eq!(timeline.meets_deadline, max_days <= 5);
        // January 10 + 3 days.
        let jacket = timeline.by_item.get(&Category::new("jacket")).expect("jacket entry");
        assert_eq!(jacket.days, 3);
        assert_eq!(jacket.date, "January 13, 2026");
        assert_eq!(jacket.retailer, "REI");
    }

    #[test]
    fn empty_cart_produces_empty_summaries() {
        let brief =
            ShoppingBrief { items: vec![Category::new("snowshoes")], ..skiing_brief() };

        let discovery =
            discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), fixed_now())
                .expect("discovery should succeed");

        assert!(discovery.auto_cart.is_empty());
        assert_eq!(discovery.total, Decimal::ZERO);
        assert_eq!(discovery.delivery_timeline.latest_delivery_days, 0);
        assert!(discovery.delivery_timeline.meets_deadline);
        assert_eq!(discovery.retailer_optimization.num_retailers, 0);
        assert_eq!(discovery.retailer_optimization.shipping_estimate, Decimal::ZERO);
    }

    #[test]
    fn invalid_brief_is_rejected_before_ranking() {
        let brief = ShoppingBrief { budget: Decimal::ZERO, ..skiing_brief() };
        let result =
            discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), fixed_now());
        assert!(matches!(result, Err(DomainError::InvalidBrief(_))));
    }

    #[test]
    fn cart_holds_at_most_one_product_per_category() {
        let discovery = discover_at(
            &skiing_brief(),
            &Catalog::builtin(),
            &RetailerDirectory::builtin(),
            fixed_now(),
        )
        .expect("discovery should succeed");

        // Cart is keyed by category, so the invariant is structural; assert
        // the keys line up with the requested set.
        let cart: &Cart = &discovery.auto_cart;
        for category in cart.keys() {
            assert!(discovery.products.contains_key(category));
        }
    }
}
