//! Ingredient paths and per-ingredient state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::StockError;

/// The reserved category for ingredients that gate secret recipes.
pub const SECRET_CATEGORY: &str = "secret";

/// A two-segment ingredient address, `"category.name"`.
///
/// Paths are validated at construction: exactly two non-empty segments,
/// no further dots. Recipes reference ingredients by path, and the
/// `secret` category marks ingredients whose recipes need unlocking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IngredientPath {
    category: String,
    name: String,
}

impl IngredientPath {
    /// Parse a `"category.name"` path.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::MalformedPath`] unless the input is exactly
    /// two non-empty dot-separated segments.
    pub fn parse(path: &str) -> Result<Self, StockError> {
        let mut segments = path.split('.');
        let (Some(category), Some(name), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(StockError::MalformedPath {
                path: String::from(path),
            });
        };
        if category.is_empty() || name.is_empty() {
            return Err(StockError::MalformedPath {
                path: String::from(path),
            });
        }
        Ok(Self {
            category: String::from(category),
            name: String::from(name),
        })
    }

    /// The category segment.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The name segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this path lives in the restricted `secret` namespace.
    pub fn is_secret(&self) -> bool {
        self.category == SECRET_CATEGORY
    }
}

impl core::fmt::Display for IngredientPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

impl TryFrom<String> for IngredientPath {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IngredientPath> for String {
    fn from(path: IngredientPath) -> Self {
        path.to_string()
    }
}

/// Catalog entry for one ingredient, as authored in the configuration.
///
/// Converted into an [`Ingredient`] at store construction; the current
/// quantity starts at `initial_quantity` and the current unit cost at
/// `base_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSpec {
    /// Human-readable name.
    pub display_name: String,
    /// Cost per unit at game start.
    pub base_cost: Decimal,
    /// Units in stock at game start.
    #[serde(default)]
    pub initial_quantity: u32,
    /// Low-stock threshold.
    #[serde(default)]
    pub reorder_point: u32,
    /// Auto-restock batch cap.
    #[serde(default)]
    pub restock_quantity: u32,
    /// Restock priority flag.
    #[serde(default)]
    pub critical: bool,
}

impl IngredientSpec {
    /// Instantiate the live ingredient state for a new game.
    pub fn into_ingredient(self) -> Ingredient {
        Ingredient {
            display_name: self.display_name,
            quantity: self.initial_quantity,
            unit_cost: self.base_cost,
            reorder_point: self.reorder_point,
            restock_quantity: self.restock_quantity,
            critical: self.critical,
        }
    }
}

/// State of one ingredient in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Human-readable name shown in reports.
    pub display_name: String,
    /// Units currently in stock. Never negative; consumption is gated by
    /// an availability check.
    pub quantity: u32,
    /// Current cost per unit.
    pub unit_cost: Decimal,
    /// Stock level at or below which the ingredient counts as low.
    pub reorder_point: u32,
    /// Maximum units bought in one auto-restock pass.
    pub restock_quantity: u32,
    /// Whether running out threatens the whole menu (restock priority).
    pub critical: bool,
}
