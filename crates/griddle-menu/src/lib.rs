//! Recipe catalog for the griddle simulation.
//!
//! The menu is read-only after load. It maps recipe ids to ingredient
//! requirements and prices, detects secret recipes (those needing an
//! ingredient from the `secret` namespace), and answers profitability
//! queries against the stock store's current unit costs.
//!
//! Content errors follow the skip-not-abort policy: a malformed catalog
//! entry is logged and excluded; only a catalog with no usable recipes at
//! all is fatal, since the simulation cannot run without a menu.

pub mod catalog;

pub use catalog::{MenuCatalog, Recipe, RecipeSpec};

/// Errors that can occur when building or querying the menu.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// No usable recipe survived catalog load.
    #[error("recipe catalog is empty after load")]
    EmptyCatalog,

    /// A recipe id was looked up that the catalog does not contain.
    #[error("unknown recipe: {id}")]
    UnknownRecipe {
        /// The id that was looked up.
        id: String,
    },
}
