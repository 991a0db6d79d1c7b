//! Ingredient store for the griddle simulation.
//!
//! Tracks ingredient quantities and unit costs, answers availability
//! queries for recipe requirements, and performs budgeted automatic
//! restocking of low items.
//!
//! # Invariants
//!
//! - Quantities never go negative: consumption is gated by a full
//!   availability check and is all-or-nothing.
//! - Availability reports list *every* shortfall, not just the first.
//! - Restocking respects the caller's budget and the per-item batch cap.

pub mod ingredient;
pub mod store;

pub use ingredient::{Ingredient, IngredientPath, IngredientSpec, SECRET_CATEGORY};
pub use store::{LowStockItem, StockStore};

/// Errors that can occur during stock operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// A path was not of the `"category.name"` form.
    #[error("malformed ingredient path: {path:?}")]
    MalformedPath {
        /// The rejected input.
        path: String,
    },

    /// The path is well-formed but no such ingredient is registered.
    #[error("unknown ingredient: {path}")]
    UnknownIngredient {
        /// The path that was looked up.
        path: String,
    },

    /// Purchases must add at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The stock counter would overflow.
    #[error("stock quantity overflow for {path}")]
    QuantityOverflow {
        /// The ingredient whose counter would wrap.
        path: String,
    },

    /// Requirements could not be met; nothing was consumed.
    #[error("insufficient stock: {0}")]
    Shortfall(griddle_types::StockShortfall),
}
