//! Data models
//!
//! Input shapes for the category tree and product list, plus the cart line
//! and contact fields that flow into order export.

pub mod cart;
pub mod category;
pub mod contact;
pub mod product;
pub mod theme;

// Re-exports
pub use cart::*;
pub use category::*;
pub use contact::*;
pub use product::*;
pub use theme::*;
