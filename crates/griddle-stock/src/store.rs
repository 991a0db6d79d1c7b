//! The ingredient store: availability, purchase, consumption, restocking.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use griddle_types::{RestockReport, ShortfallItem, StockShortfall};

use crate::ingredient::{Ingredient, IngredientPath};
use crate::StockError;

/// An ingredient at or below its reorder point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowStockItem {
    /// Path of the ingredient.
    pub path: IngredientPath,
    /// Display name.
    pub name: String,
    /// Units currently in stock.
    pub quantity: u32,
    /// The reorder threshold.
    pub reorder_point: u32,
    /// Whether the ingredient is restock-critical.
    pub critical: bool,
}

/// The restaurant's ingredient store.
///
/// Quantities only increase through [`StockStore::add`] and only decrease
/// through [`StockStore::consume`], which is gated by a full availability
/// check -- a quantity can never go negative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockStore {
    items: BTreeMap<IngredientPath, Ingredient>,
}

impl StockStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Number of distinct ingredients tracked.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store tracks no ingredients.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Register an ingredient. Replaces any previous entry at the path.
    pub fn insert(&mut self, path: IngredientPath, ingredient: Ingredient) {
        self.items.insert(path, ingredient);
    }

    /// Build a store from the configured ingredient catalog
    /// (`category -> name -> spec`).
    ///
    /// Entries whose assembled path is malformed are logged and skipped
    /// rather than aborting startup.
    pub fn from_catalog(
        catalog: &BTreeMap<String, BTreeMap<String, crate::ingredient::IngredientSpec>>,
    ) -> Self {
        let mut store = Self::new();
        for (category, entries) in catalog {
            for (name, spec) in entries {
                match IngredientPath::parse(&format!("{category}.{name}")) {
                    Ok(path) => store.insert(path, spec.clone().into_ingredient()),
                    Err(err) => {
                        tracing::warn!(category, name, %err, "skipping bad ingredient entry");
                    }
                }
            }
        }
        store
    }

    /// Look up an ingredient by path.
    pub fn get(&self, path: &IngredientPath) -> Option<&Ingredient> {
        self.items.get(path)
    }

    /// Units in stock at a path; 0 for unknown ingredients.
    pub fn quantity(&self, path: &IngredientPath) -> u32 {
        self.items.get(path).map_or(0, |item| item.quantity)
    }

    /// Unit cost at a path, if the ingredient exists.
    pub fn unit_cost(&self, path: &IngredientPath) -> Option<Decimal> {
        self.items.get(path).map(|item| item.unit_cost)
    }

    /// Iterate over all ingredients in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&IngredientPath, &Ingredient)> {
        self.items.iter()
    }

    /// Total monetary value of the stock (quantity times unit cost).
    pub fn total_value(&self) -> Decimal {
        self.items.values().fold(Decimal::ZERO, |acc, item| {
            acc.saturating_add(item.unit_cost.saturating_mul(Decimal::from(item.quantity)))
        })
    }

    /// Check that every requirement can be met from current stock.
    ///
    /// # Errors
    ///
    /// Returns a [`StockShortfall`] listing *every* missing and
    /// insufficient ingredient -- never just the first problem found.
    pub fn check_availability(
        &self,
        requirements: &BTreeMap<IngredientPath, u32>,
    ) -> Result<(), StockShortfall> {
        let mut shortfall = StockShortfall::default();

        for (path, &needed) in requirements {
            match self.items.get(path) {
                None => shortfall.missing.push(path.to_string()),
                Some(item) if item.quantity < needed => {
                    shortfall.insufficient.push(ShortfallItem {
                        name: item.display_name.clone(),
                        needed,
                        available: item.quantity,
                    });
                }
                Some(_) => {}
            }
        }

        if shortfall.is_empty() {
            Ok(())
        } else {
            Err(shortfall)
        }
    }

    /// Add purchased units to an ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::ZeroQuantity`] for `quantity == 0`,
    /// [`StockError::UnknownIngredient`] for an unregistered path, or
    /// [`StockError::QuantityOverflow`] if the stock counter would wrap.
    pub fn add(&mut self, path: &IngredientPath, quantity: u32) -> Result<u32, StockError> {
        if quantity == 0 {
            return Err(StockError::ZeroQuantity);
        }
        let item = self
            .items
            .get_mut(path)
            .ok_or_else(|| StockError::UnknownIngredient {
                path: path.to_string(),
            })?;

        item.quantity = item
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| StockError::QuantityOverflow {
                path: path.to_string(),
            })?;

        debug!(%path, quantity, total = item.quantity, "stock added");
        Ok(item.quantity)
    }

    /// Consume the given requirements, all-or-nothing.
    ///
    /// The availability check runs first; on any shortfall nothing is
    /// consumed and the full report is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Shortfall`] when stock cannot cover the
    /// requirements.
    pub fn consume(
        &mut self,
        requirements: &BTreeMap<IngredientPath, u32>,
    ) -> Result<(), StockError> {
        self.check_availability(requirements)
            .map_err(StockError::Shortfall)?;

        for (path, &needed) in requirements {
            if let Some(item) = self.items.get_mut(path) {
                item.quantity = item.quantity.saturating_sub(needed);
            }
        }
        Ok(())
    }

    /// Ingredients at or below their reorder point, ordered by
    /// (critical desc, quantity asc) -- the restock priority order.
    pub fn low_stock(&self) -> Vec<LowStockItem> {
        let mut low: Vec<LowStockItem> = self
            .items
            .iter()
            .filter(|(_, item)| item.quantity <= item.reorder_point)
            .map(|(path, item)| LowStockItem {
                path: path.clone(),
                name: item.display_name.clone(),
                quantity: item.quantity,
                reorder_point: item.reorder_point,
                critical: item.critical,
            })
            .collect();
        low.sort_by_key(|item| (core::cmp::Reverse(item.critical), item.quantity));
        low
    }

    /// Restock low ingredients within a budget.
    ///
    /// Walks [`StockStore::low_stock`] in priority order. For each item
    /// the order quantity is the shortfall to its reorder point, capped by
    /// its restock batch size; an item whose order cost exceeds the
    /// remaining budget is skipped (no per-unit partial fills), and the
    /// walk stops once the budget is exhausted.
    ///
    /// Returns what was bought and the total cost; the caller settles the
    /// payment through the ledger.
    pub fn auto_restock(&mut self, budget: Decimal) -> RestockReport {
        let mut report = RestockReport::default();

        for low in self.low_stock() {
            if report.total_cost >= budget {
                break;
            }
            let Some(item) = self.items.get(&low.path) else {
                continue;
            };
            let needed = item.reorder_point.saturating_sub(item.quantity);
            if needed == 0 {
                continue;
            }
            let order_qty = needed.min(item.restock_quantity);
            if order_qty == 0 {
                continue;
            }
            let order_cost = item.unit_cost.saturating_mul(Decimal::from(order_qty));
            if report.total_cost.saturating_add(order_cost) > budget {
                continue;
            }
            if self.add(&low.path, order_qty).is_ok() {
                report.total_cost = report.total_cost.saturating_add(order_cost);
                report.restocked.push((low.name.clone(), order_qty));
            }
        }

        if !report.restocked.is_empty() {
            info!(
                items = report.restocked.len(),
                total_cost = %report.total_cost,
                "auto-restock complete"
            );
        }
        report
    }

    /// Quantities by path string, for the snapshot.
    pub fn quantities(&self) -> BTreeMap<String, u32> {
        self.items
            .iter()
            .map(|(path, item)| (path.to_string(), item.quantity))
            .collect()
    }

    /// Overwrite quantities from a snapshot map.
    ///
    /// Paths not present in the store are ignored (the catalog is the
    /// source of truth for which ingredients exist).
    pub fn restore_quantities(&mut self, quantities: &BTreeMap<String, u32>) {
        for (path, &quantity) in quantities {
            if let Ok(parsed) = IngredientPath::parse(path) {
                if let Some(item) = self.items.get_mut(&parsed) {
                    item.quantity = quantity;
                }
            }
        }
    }
}
