pub mod catalog;
pub mod checkout;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod ranking;

pub use catalog::{Catalog, RetailerDirectory};
pub use checkout::{simulate_checkout, CheckoutStep};
pub use discovery::{
    discover, discover_at, BudgetBreakdown, Cart, DeliveryTimeline, Discovery, ItemDelivery,
    RetailerOptimization,
};
pub use domain::brief::{Preferences, Scenario, ShoppingBrief};
pub use domain::product::{Category, Product, ProductId, SafetyRating, Warmth};
pub use domain::retailer::{Retailer, RetailerKey};
pub use errors::DomainError;
pub use ranking::{rank_products, RankedProduct};
