//! The recipe catalog.

use std::collections::BTreeMap;
use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use griddle_stock::{IngredientPath, StockStore};
use griddle_types::Profitability;

use crate::MenuError;

/// Catalog entry for one recipe, as authored in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSpec {
    /// Display name. Entries without a name are rejected at load.
    #[serde(default)]
    pub name: String,
    /// Ingredient path -> units required per prepared unit.
    #[serde(default)]
    pub ingredients: BTreeMap<String, u32>,
    /// Nominal preparation cost per unit.
    #[serde(default)]
    pub cost: Decimal,
    /// Menu price per unit.
    #[serde(default)]
    pub price: Decimal,
}

/// A validated, immutable recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Catalog key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ingredient requirements per prepared unit.
    pub ingredients: BTreeMap<IngredientPath, u32>,
    /// Nominal preparation cost per unit.
    pub cost: Decimal,
    /// Menu price per unit.
    pub price: Decimal,
}

impl Recipe {
    /// Whether the recipe needs any ingredient from the `secret`
    /// namespace, and therefore an unlock before it can be sold.
    pub fn is_secret(&self) -> bool {
        self.ingredients.keys().any(IngredientPath::is_secret)
    }

    /// Ingredient requirements scaled by a batch size.
    pub fn scaled_ingredients(&self, batch: u32) -> BTreeMap<IngredientPath, u32> {
        self.ingredients
            .iter()
            .map(|(path, &qty)| (path.clone(), qty.saturating_mul(batch)))
            .collect()
    }
}

/// The menu: recipe id to recipe, read-only after load.
///
/// Ingredient-cost lookups against the stock store are cached per recipe;
/// the catalog itself never changes after construction, and unit costs
/// only move at catalog load, so the cache never needs invalidation.
#[derive(Debug, Default)]
pub struct MenuCatalog {
    recipes: BTreeMap<String, Recipe>,
    cost_cache: Mutex<BTreeMap<String, Decimal>>,
}

impl MenuCatalog {
    /// Build the catalog from configured entries.
    ///
    /// Entries without a name, or with an unparsable ingredient path, are
    /// logged and skipped -- a single bad entry must not abort startup.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::EmptyCatalog`] when no entry survives: the
    /// simulation cannot run without recipes.
    pub fn from_entries(
        entries: &BTreeMap<String, RecipeSpec>,
    ) -> Result<Self, MenuError> {
        let mut recipes = BTreeMap::new();

        'entry: for (id, spec) in entries {
            if spec.name.is_empty() {
                warn!(recipe = id, "skipping recipe without a name");
                continue;
            }
            let mut ingredients = BTreeMap::new();
            for (raw_path, &qty) in &spec.ingredients {
                match IngredientPath::parse(raw_path) {
                    Ok(path) => {
                        ingredients.insert(path, qty);
                    }
                    Err(err) => {
                        warn!(recipe = id, path = raw_path, %err, "skipping recipe with bad ingredient path");
                        continue 'entry;
                    }
                }
            }
            recipes.insert(
                id.clone(),
                Recipe {
                    id: id.clone(),
                    name: spec.name.clone(),
                    ingredients,
                    cost: spec.cost,
                    price: spec.price,
                },
            );
        }

        if recipes.is_empty() {
            return Err(MenuError::EmptyCatalog);
        }

        info!(recipes = recipes.len(), "menu catalog loaded");
        Ok(Self {
            recipes,
            cost_cache: Mutex::new(BTreeMap::new()),
        })
    }

    /// Look up a recipe by id.
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// All recipes, in id order.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Number of recipes in the catalog.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the catalog is empty. Never true for a loaded catalog.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Ids of recipes gated behind the secret-ingredient namespace.
    pub fn secret_recipe_ids(&self) -> Vec<String> {
        self.recipes
            .values()
            .filter(|recipe| recipe.is_secret())
            .map(|recipe| recipe.id.clone())
            .collect()
    }

    /// Ids of the non-secret recipes -- the starting unlocked set.
    pub fn base_recipe_ids(&self) -> Vec<String> {
        self.recipes
            .values()
            .filter(|recipe| !recipe.is_secret())
            .map(|recipe| recipe.id.clone())
            .collect()
    }

    /// Total ingredient cost of one unit of a recipe, priced against the
    /// stock store's current unit costs. Cached per recipe id.
    ///
    /// Ingredients the store does not know are priced at zero, matching
    /// the availability check's treatment of them as missing.
    pub fn ingredient_cost(&self, id: &str, store: &StockStore) -> Option<Decimal> {
        if let Ok(cache) = self.cost_cache.lock() {
            if let Some(&cached) = cache.get(id) {
                return Some(cached);
            }
        }

        let recipe = self.recipes.get(id)?;
        let total = recipe
            .ingredients
            .iter()
            .fold(Decimal::ZERO, |acc, (path, &qty)| {
                let unit = store.unit_cost(path).unwrap_or(Decimal::ZERO);
                acc.saturating_add(unit.saturating_mul(Decimal::from(qty)))
            });

        if let Ok(mut cache) = self.cost_cache.lock() {
            cache.insert(String::from(id), total);
        }
        Some(total)
    }

    /// Profitability analysis of one recipe: ingredient cost, price,
    /// profit, and margin percentage.
    pub fn profitability(&self, id: &str, store: &StockStore) -> Option<Profitability> {
        let recipe = self.recipes.get(id)?;
        let cost = self.ingredient_cost(id, store)?;
        let profit = recipe.price.saturating_sub(cost);
        let margin_percent = if recipe.price > Decimal::ZERO {
            profit
                .saturating_mul(Decimal::ONE_HUNDRED)
                .checked_div(recipe.price)
                .unwrap_or(Decimal::ZERO)
                .round_dp(1)
        } else {
            Decimal::ZERO
        };

        Some(Profitability {
            recipe_id: recipe.id.clone(),
            recipe_name: recipe.name.clone(),
            ingredient_cost: cost,
            selling_price: recipe.price,
            profit,
            margin_percent,
            profitable: profit > Decimal::ZERO,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use griddle_stock::{Ingredient, IngredientPath};

    use super::*;

    fn spec(name: &str, ingredients: &[(&str, u32)], cost: Decimal, price: Decimal) -> RecipeSpec {
        RecipeSpec {
            name: String::from(name),
            ingredients: ingredients
                .iter()
                .map(|(path, qty)| (String::from(*path), *qty))
                .collect(),
            cost,
            price,
        }
    }

    fn sample_entries() -> BTreeMap<String, RecipeSpec> {
        BTreeMap::from([
            (
                String::from("classic"),
                spec(
                    "Classic Burger",
                    &[("hamburger.beef", 1), ("bread.bun", 1)],
                    dec!(2.0),
                    dec!(6.5),
                ),
            ),
            (
                String::from("royale"),
                spec(
                    "Truffle Royale",
                    &[("hamburger.beef", 2), ("secret.truffle", 1)],
                    dec!(7.0),
                    dec!(18.0),
                ),
            ),
        ])
    }

    fn sample_store() -> StockStore {
        let mut store = StockStore::new();
        store.insert(
            IngredientPath::parse("hamburger.beef").unwrap(),
            Ingredient {
                display_name: String::from("Beef Patty"),
                quantity: 10,
                unit_cost: dec!(1.5),
                reorder_point: 3,
                restock_quantity: 10,
                critical: true,
            },
        );
        store.insert(
            IngredientPath::parse("bread.bun").unwrap(),
            Ingredient {
                display_name: String::from("Bun"),
                quantity: 10,
                unit_cost: dec!(0.5),
                reorder_point: 3,
                restock_quantity: 10,
                critical: false,
            },
        );
        store
    }

    #[test]
    fn catalog_splits_secret_from_base() {
        let catalog = MenuCatalog::from_entries(&sample_entries()).unwrap();
        assert_eq!(catalog.base_recipe_ids(), vec![String::from("classic")]);
        assert_eq!(catalog.secret_recipe_ids(), vec![String::from("royale")]);
    }

    #[test]
    fn bad_entries_are_skipped_not_fatal() {
        let mut entries = sample_entries();
        entries.insert(String::from("nameless"), spec("", &[], dec!(1), dec!(2)));
        entries.insert(
            String::from("badpath"),
            spec("Bad Path", &[("not-a-path", 1)], dec!(1), dec!(2)),
        );

        let catalog = MenuCatalog::from_entries(&entries).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.recipe("nameless").is_none());
        assert!(catalog.recipe("badpath").is_none());
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let entries = BTreeMap::new();
        assert!(matches!(
            MenuCatalog::from_entries(&entries),
            Err(MenuError::EmptyCatalog)
        ));
    }

    #[test]
    fn ingredient_cost_sums_quantity_times_unit_cost() {
        let catalog = MenuCatalog::from_entries(&sample_entries()).unwrap();
        let store = sample_store();
        // 1 beef @ 1.5 + 1 bun @ 0.5
        assert_eq!(catalog.ingredient_cost("classic", &store), Some(dec!(2.0)));
        // Cached second call returns the same value.
        assert_eq!(catalog.ingredient_cost("classic", &store), Some(dec!(2.0)));
    }

    #[test]
    fn profitability_reports_margin() {
        let catalog = MenuCatalog::from_entries(&sample_entries()).unwrap();
        let store = sample_store();
        let analysis = catalog.profitability("classic", &store).unwrap();
        assert_eq!(analysis.ingredient_cost, dec!(2.0));
        assert_eq!(analysis.selling_price, dec!(6.5));
        assert_eq!(analysis.profit, dec!(4.5));
        // 4.5 / 6.5 * 100 = 69.2 (rounded to one decimal)
        assert_eq!(analysis.margin_percent, dec!(69.2));
        assert!(analysis.profitable);
    }

    #[test]
    fn zero_price_recipe_has_zero_margin() {
        let entries = BTreeMap::from([(
            String::from("free"),
            spec("Freebie", &[("bread.bun", 1)], dec!(0), dec!(0)),
        )]);
        let catalog = MenuCatalog::from_entries(&entries).unwrap();
        let store = sample_store();
        let analysis = catalog.profitability("free", &store).unwrap();
        assert_eq!(analysis.margin_percent, Decimal::ZERO);
        assert!(!analysis.profitable);
    }

    #[test]
    fn scaled_ingredients_multiply_requirements() {
        let catalog = MenuCatalog::from_entries(&sample_entries()).unwrap();
        let recipe = catalog.recipe("classic").unwrap();
        let scaled = recipe.scaled_ingredients(3);
        let beef = IngredientPath::parse("hamburger.beef").unwrap();
        assert_eq!(scaled.get(&beef), Some(&3));
    }
}
