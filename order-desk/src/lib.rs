//! Order desk core
//!
//! State for a catalog ordering screen: a category tree whose selection
//! restricts a filterable, sortable, paginated product table, an order cart
//! fed by the table's quantity fields, and the plain-text order document
//! built from the cart.
//!
//! # Modules
//!
//! - [`category_store`] - category tree, expansion, search, subtree codes
//! - [`catalog`] - product filters, sort, pagination, pending quantities
//! - [`cart_store`] - cart lines, selection, totals
//! - [`order_text`] - order and express-order documents
//! - [`quick_order`] - per-row quick order popover
//! - [`session`] - host callbacks and product load sequencing
//! - [`sources`] - catalog loading and order delivery collaborators
//! - [`preferences`] - persisted UI theme

pub mod cart_store;
pub mod catalog;
pub mod category_store;
pub mod error;
pub mod logger;
pub mod order_text;
pub mod preferences;
pub mod quick_order;
pub mod session;
pub mod sources;

// Re-export common types
pub use cart_store::{CartEvent, CartStore};
pub use catalog::{CatalogFilter, PageSize, ProductFilters, SortDirection, SortKey, SortSpec};
pub use category_store::{CategoryStore, GroupIndex};
pub use error::{DeskError, DeskResult};
pub use order_text::{format_express_order, format_order};
pub use preferences::UiPreferences;
pub use quick_order::{ExpressOrder, QuickOrder, QuickOrderEffect, QuickOrderState};
pub use session::{LoadOutcome, LoadTicket, OrderDesk, ProductRequest};
pub use sources::{CatalogSource, FileDelivery, JsonDirSource, OrderDelivery};
