//! Deterministic multi-factor product ranking.
//!
//! Each candidate is scored against the brief on four components — price,
//! delivery, quality, and preference bonuses — and the per-component
//! contributions are recorded as a human-readable reasoning trail in the same
//! order. No randomness, no external calls: the same inputs always produce
//! the same ranking.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::RetailerDirectory;
use crate::domain::brief::{Preferences, ShoppingBrief};
use crate::domain::product::Product;
use crate::domain::retailer::Retailer;

pub const PRICE_POINTS_MAX: f64 = 40.0;
pub const DELIVERY_POINTS_MAX: f64 = 30.0;
/// Late items keep a small floor score so they stay visible but penalized.
pub const LATE_DELIVERY_POINTS: f64 = 5.0;
pub const QUALITY_POINTS_PER_STAR: f64 = 5.0;
pub const WARMTH_MATCH_BONUS: f64 = 15.0;
pub const WATERPROOF_BONUS: f64 = 10.0;
pub const BRAND_MATCH_BONUS: f64 = 10.0;

/// A product annotated with its score and the audit trail that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
    pub reasoning: Vec<String>,
    pub delivery_days: u32,
}

/// Scores and sorts one category's candidates against a brief.
///
/// The sort is stable: candidates with equal scores keep their catalog order.
/// Candidates whose retailer key is missing from the directory are skipped.
/// Callers are expected to pass a validated brief; a zero budget or deadline
/// is still handled without panicking (everything scores as over budget or
/// late).
pub fn rank_products(
    candidates: &[Product],
    brief: &ShoppingBrief,
    directory: &RetailerDirectory,
) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = candidates
        .iter()
        .filter_map(|product| {
            let retailer = directory.get(&product.retailer)?;
            Some(score_product(product, retailer, brief))
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

fn score_product(product: &Product, retailer: &Retailer, brief: &ShoppingBrief) -> RankedProduct {
    let mut reasoning = Vec::new();

    let (price_points, price_note) = price_component(product.price, brief.budget);
    reasoning.push(price_note);

    let (delivery_points, delivery_note) =
        delivery_component(retailer.base_delivery_days, brief.delivery_days);
    reasoning.push(delivery_note);

    let (quality_points, quality_note) = quality_component(product.rating);
    reasoning.push(quality_note);

    let (bonus_points, bonus_notes) = preference_bonuses(product, &brief.preferences);
    reasoning.extend(bonus_notes);

    reasoning.push(format!("Retailer: {}", retailer.name));

    let total = price_points + delivery_points + quality_points + bonus_points;
    RankedProduct {
        product: product.clone(),
        score: round_to_tenth(total),
        reasoning,
        delivery_days: retailer.base_delivery_days,
    }
}

fn price_component(price: Decimal, budget: Decimal) -> (f64, String) {
    if budget > Decimal::ZERO && price <= budget {
        let price_ratio = (price / budget).to_f64().unwrap_or(1.0);
        let points = (1.0 - price_ratio) * PRICE_POINTS_MAX;
        (points, format!("Price: ${price} ({}pts)", points.round() as i64))
    } else {
        (0.0, format!("Price: ${price} (OVER BUDGET, 0pts)"))
    }
}

fn delivery_component(base_delivery_days: u32, deadline_days: u32) -> (f64, String) {
    if deadline_days > 0 && base_delivery_days <= deadline_days {
        let time_ratio = f64::from(base_delivery_days) / f64::from(deadline_days);
        let points = DELIVERY_POINTS_MAX * (1.0 - time_ratio * 0.5);
        (points, format!("Delivery: {base_delivery_days}d ({}pts)", points.round() as i64))
    } else {
        (
            LATE_DELIVERY_POINTS,
            format!(
                "Delivery: {base_delivery_days}d (LATE, {}pts)",
                LATE_DELIVERY_POINTS.round() as i64
            ),
        )
    }
}

fn quality_component(rating: f64) -> (f64, String) {
    let points = rating * QUALITY_POINTS_PER_STAR;
    (points, format!("Rating: {rating}⭐ ({}pts)", points.round() as i64))
}

fn preference_bonuses(product: &Product, preferences: &Preferences) -> (f64, Vec<String>) {
    let mut points = 0.0;
    let mut notes = Vec::new();

    if let (Some(wanted), Some(actual)) = (preferences.warmth, product.warmth) {
        if wanted == actual {
            points += WARMTH_MATCH_BONUS;
            notes.push(format!("Warmth match (+{}pts)", WARMTH_MATCH_BONUS.round() as i64));
        }
    }

    if preferences.waterproof && product.waterproof == Some(true) {
        points += WATERPROOF_BONUS;
        notes.push(format!("Waterproof (+{}pts)", WATERPROOF_BONUS.round() as i64));
    }

    if let Some(brand) = &preferences.brand {
        if !brand.trim().is_empty()
            && product.name.to_ascii_lowercase().contains(&brand.trim().to_ascii_lowercase())
        {
            points += BRAND_MATCH_BONUS;
            notes.push(format!("Brand match (+{}pts)", BRAND_MATCH_BONUS.round() as i64));
        }
    }

    // Color preference is carried in the brief but deliberately does not
    // contribute to the score.

    (points, notes)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
