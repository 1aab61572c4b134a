//! Shared types for the order desk
//!
//! Catalog data model (category tree, product records, cart lines, contact
//! fields, UI theme) and the price normalization used everywhere a price is
//! compared or summed.

pub mod ids;
pub mod models;
pub mod money;

// Re-exports
pub use ids::NodeId;
pub use models::{
    CartLine, CategoryNode, ContactFields, PriceValue, ProductRecord, RawCategory, Theme,
};
pub use serde::{Deserialize, Serialize};
