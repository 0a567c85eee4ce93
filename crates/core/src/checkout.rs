//! Display-only checkout simulation.
//!
//! Produces the ordered pseudo-steps a real multi-retailer checkout would
//! walk through. Every step starts (and stays) pending; no state machine, no
//! retries, no external calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::RetailerDirectory;
use crate::discovery::Cart;
use crate::domain::retailer::RetailerKey;

pub const STEP_STATUS_PENDING: &str = "pending";
/// Scope marker for steps that span every retailer in the cart.
pub const ALL_RETAILERS: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutStep {
    pub id: u32,
    pub title: String,
    pub status: String,
    pub retailer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

/// Builds the pseudo-checkout step list for a cart.
///
/// Fixed payment and shipping steps come first, then one order step per
/// distinct retailer (deterministic key order), then a final confirmation.
/// Ids are sequential from 1.
pub fn simulate_checkout(cart: &Cart, directory: &RetailerDirectory) -> Vec<CheckoutStep> {
    let mut by_retailer: BTreeMap<RetailerKey, Vec<String>> = BTreeMap::new();
    for item in cart.values() {
        by_retailer
            .entry(item.product.retailer.clone())
            .or_default()
            .push(item.product.name.clone());
    }

    let mut steps = vec![
        fixed_step(1, "Collecting Payment Information"),
        fixed_step(2, "Collecting Shipping Address"),
    ];

    for (index, (key, items)) in by_retailer.iter().enumerate() {
        steps.push(CheckoutStep {
            id: index as u32 + 3,
            title: format!("Processing {} Order", directory.display_name(key)),
            status: STEP_STATUS_PENDING.to_string(),
            retailer: key.0.clone(),
            items: Some(items.clone()),
        });
    }

    steps.push(fixed_step(by_retailer.len() as u32 + 3, "Confirming All Orders"));
    steps
}

fn fixed_step(id: u32, title: &str) -> CheckoutStep {
    CheckoutStep {
        id,
        title: title.to_string(),
        status: STEP_STATUS_PENDING.to_string(),
        retailer: ALL_RETAILERS.to_string(),
        items: None,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::{Catalog, RetailerDirectory};
    use crate::discovery::{discover_at, Cart};
    use crate::domain::brief::ShoppingBrief;
    use crate::domain::product::Category;

    use super::{simulate_checkout, ALL_RETAILERS, STEP_STATUS_PENDING};

    fn sample_cart() -> Cart {
        let brief = ShoppingBrief {
            budget: Decimal::from(400),
            items: ["jacket", "pants", "gloves", "goggles", "helmet"]
                .into_iter()
                .map(Category::new)
                .collect(),
            ..ShoppingBrief::default()
        };
        let now = chrono::Utc::now();
        discover_at(&brief, &Catalog::builtin(), &RetailerDirectory::builtin(), now)
            .expect("discovery should succeed")
            .auto_cart
    }

    #[test]
    fn steps_are_sequential_and_pending() {
        let cart = sample_cart();
        let steps = simulate_checkout(&cart, &RetailerDirectory::builtin());

        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.id, index as u32 + 1, "ids must be sequential from 1");
            assert_eq!(step.status, STEP_STATUS_PENDING);
        }
    }

    #[test]
    fn one_order_step_per_distinct_retailer() {
        let cart = sample_cart();
        let distinct: std::collections::BTreeSet<_> =
            cart.values().map(|item| item.product.retailer.clone()).collect();

        let steps = simulate_checkout(&cart, &RetailerDirectory::builtin());
        assert_eq!(steps.len(), distinct.len() + 3);

        let order_steps: Vec<_> =
            steps.iter().filter(|step| step.retailer != ALL_RETAILERS).collect();
        assert_eq!(order_steps.len(), distinct.len());
        let listed: usize =
            order_steps.iter().map(|step| step.items.as_ref().map_or(0, Vec::len)).sum();
        assert_eq!(listed, cart.len(), "every cart item appears in exactly one order step");
    }

    #[test]
    fn fixed_steps_frame_the_retailer_steps() {
        let cart = sample_cart();
        let steps = simulate_checkout(&cart, &RetailerDirectory::builtin());

        assert_eq!(steps.first().map(|step| step.title.as_str()), Some("Collecting Payment Information"));
        assert_eq!(steps[1].title, "Collecting Shipping Address");
        assert_eq!(steps.last().map(|step| step.title.as_str()), Some("Confirming All Orders"));
        assert_eq!(steps.last().map(|step| step.retailer.as_str()), Some(ALL_RETAILERS));
    }

    #[test]
    fn order_step_titles_use_display_names() {
        let cart = sample_cart();
        let directory = RetailerDirectory::builtin();
        let steps = simulate_checkout(&cart, &directory);

        for step in steps.iter().filter(|step| step.retailer != ALL_RETAILERS) {
            assert!(step.title.starts_with("Processing "));
            assert!(step.title.ends_with(" Order"));
        }
    }

    #[test]
    fn empty_cart_still_produces_the_fixed_frame() {
        let steps = simulate_checkout(&Cart::new(), &RetailerDirectory::builtin());
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2].id, 3);
        assert_eq!(steps[2].title, "Confirming All Orders");
    }
}
