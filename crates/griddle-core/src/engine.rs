//! The game engine: the aggregate root driving the hourly state machine.
//!
//! One simulated hour is processed at a time; processing an hour
//! completes (events, arrivals, production, settlement) before the next
//! begins. Within the hour, customer arrivals run as concurrent tasks
//! against the shared order board; the stock store and ledger sit behind
//! their own mutexes so those tasks can read availability while the
//! engine settles money.
//!
//! Commands never raise: every mutation returns a typed receipt or a
//! typed decline, and declines leave the game state unchanged. Terminal
//! conditions (bankruptcy, reputation collapse, surviving the configured
//! days) are outcomes, checked before any further hour is processed.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use griddle_ledger::{DayCloseOutcome, Ledger, LedgerError};
use griddle_menu::MenuCatalog;
use griddle_stock::{IngredientPath, StockError, StockStore};
use griddle_types::{
    Achievement, DailySettlement, DayReport, Difficulty, FinalStats, GameId, GameOutcome,
    GameSnapshot, HourlyReport, Order, RestockReport, TransactionKind, UpgradeKind,
};

use crate::achievements::AchievementTracker;
use crate::clock::{GameClock, HourAdvance};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::events::{Activation, EventEngine};
use crate::kitchen::{self, KitchenShift};
use crate::observer::EngineObserver;
use crate::orders::{self, ArrivalContext, OrderBoard};
use crate::reputation::Reputation;
use crate::upgrades::UpgradeTracker;

/// Base customer chance per unit of configured customer frequency.
const BASE_ARRIVAL_CHANCE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Units-per-order cap applied on top of the configured maximum.
const UNITS_PER_ORDER_CAP: u32 = 3;

/// Queue-full rejection threshold, in multiples of the concurrent-order
/// limit.
const QUEUE_CAP_FACTOR: u32 = 3;

/// Identity entered at new-game time.
#[derive(Debug, Clone)]
pub struct NewGameParams {
    /// Player name.
    pub player_name: String,
    /// Restaurant name.
    pub restaurant_name: String,
    /// Selected difficulty.
    pub difficulty: Difficulty,
}

/// What one `advance_hour` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HourOutcome {
    /// A working hour was simulated.
    Hour(HourlyReport),
    /// The working window was exhausted; the day settled and (if the
    /// game continues) the next day began.
    DayEnded(DayReport),
    /// A terminal condition was reached; the session is over.
    Finished(FinalStats),
}

/// Receipt for an ingredient purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientPurchase {
    /// The purchased ingredient path.
    pub path: String,
    /// Units bought.
    pub quantity: u32,
    /// Total debited.
    pub total_cost: Decimal,
    /// Balance after the purchase.
    pub new_balance: Decimal,
}

/// Receipt for an upgrade purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePurchase {
    /// The purchased upgrade.
    pub kind: UpgradeKind,
    /// Its new level.
    pub level: u32,
    /// Price paid (base cost scaled by levels already owned).
    pub cost: Decimal,
    /// Balance after the purchase.
    pub new_balance: Decimal,
    /// Kitchen capacity derived from the new upgrade counts.
    pub base_capacity: u32,
    /// The secret recipe unlocked, for recipe-unlock purchases.
    pub unlocked_recipe: Option<String>,
}

/// The engine.
pub struct GameEngine {
    config: GameConfig,
    game_id: GameId,
    player_name: String,
    restaurant_name: String,
    difficulty: Difficulty,
    clock: GameClock,
    reputation: Reputation,
    menu: Arc<MenuCatalog>,
    stock: Arc<Mutex<StockStore>>,
    ledger: Arc<Mutex<Ledger>>,
    board: Arc<OrderBoard>,
    events: EventEngine,
    upgrades: UpgradeTracker,
    achievements: AchievementTracker,
    unlocked_recipes: BTreeSet<String>,
    orders_completed_today: u32,
    orders_completed_total: u64,
    rng: SmallRng,
    observer: Box<dyn EngineObserver>,
    outcome: Option<GameOutcome>,
}

impl core::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEngine")
            .field("game_id", &self.game_id)
            .field("day", &self.clock.day())
            .field("hour", &self.clock.hour())
            .field("difficulty", &self.difficulty)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Start a new game.
    ///
    /// # Errors
    ///
    /// Returns an error when the recipe catalog is empty after load or
    /// the time configuration is invalid.
    pub fn new_game(
        config: GameConfig,
        params: NewGameParams,
        observer: Box<dyn EngineObserver>,
    ) -> Result<Self, EngineError> {
        let menu = Arc::new(MenuCatalog::from_entries(&config.recipes)?);
        let stock = StockStore::from_catalog(&config.ingredients);
        let level = config.difficulty_level(params.difficulty);
        let ledger = Ledger::new(
            config.economy.initial_balance,
            config.daily_costs(),
            level.profit,
        );
        let clock = GameClock::new(&config.time)?;
        let mut rng = SmallRng::seed_from_u64(config.gameplay.seed);
        let events = EventEngine::new(config.events.clone(), &mut rng);
        let unlocked_recipes: BTreeSet<String> = menu.base_recipe_ids().into_iter().collect();
        let reputation = Reputation::new(config.gameplay.initial_reputation);

        info!(
            player = params.player_name,
            restaurant = params.restaurant_name,
            difficulty = %params.difficulty,
            days = config.time.days,
            "new game started"
        );

        Ok(Self {
            config,
            game_id: GameId::new(),
            player_name: params.player_name,
            restaurant_name: params.restaurant_name,
            difficulty: params.difficulty,
            clock,
            reputation,
            menu,
            stock: Arc::new(Mutex::new(stock)),
            ledger: Arc::new(Mutex::new(ledger)),
            board: Arc::new(OrderBoard::new(1)),
            events,
            upgrades: UpgradeTracker::new(),
            achievements: AchievementTracker::new(),
            unlocked_recipes,
            orders_completed_today: 0,
            orders_completed_total: 0,
            rng,
            observer,
            outcome: None,
        })
    }

    /// Resume a game from a snapshot.
    ///
    /// The catalogs come from the configuration; the snapshot restores
    /// the mutable state, sufficient to continue at the start of the
    /// next unprocessed hour.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog is empty or the snapshot's
    /// day/hour do not fit the configured working window.
    pub fn load_game(
        config: GameConfig,
        snapshot: GameSnapshot,
        observer: Box<dyn EngineObserver>,
    ) -> Result<Self, EngineError> {
        let menu = Arc::new(MenuCatalog::from_entries(&config.recipes)?);
        let mut stock = StockStore::from_catalog(&config.ingredients);
        stock.restore_quantities(&snapshot.stock_quantities);

        let level = config.difficulty_level(snapshot.difficulty);
        let ledger = Ledger::from_snapshot(snapshot.ledger, config.daily_costs(), level.profit);
        let clock = GameClock::from_parts(&config.time, snapshot.day, snapshot.hour)?;
        let mut rng = SmallRng::seed_from_u64(config.gameplay.seed);
        let mut events = EventEngine::new(config.events.clone(), &mut rng);
        events.restore(
            snapshot.active_events,
            snapshot.hours_since_last_event,
            snapshot.next_event_interval,
        );

        info!(
            player = snapshot.player_name,
            day = snapshot.day,
            hour = snapshot.hour,
            "game restored from snapshot"
        );

        Ok(Self {
            config,
            game_id: snapshot.game_id,
            player_name: snapshot.player_name,
            restaurant_name: snapshot.restaurant_name,
            difficulty: snapshot.difficulty,
            clock,
            reputation: Reputation::new(snapshot.reputation),
            menu,
            stock: Arc::new(Mutex::new(stock)),
            ledger: Arc::new(Mutex::new(ledger)),
            board: Arc::new(OrderBoard::from_parts(
                snapshot.next_order_id,
                snapshot.order_queue,
            )),
            events,
            upgrades: UpgradeTracker::from_counts(snapshot.upgrade_counts),
            achievements: AchievementTracker::from_set(snapshot.achievements),
            unlocked_recipes: snapshot.unlocked_recipes,
            orders_completed_today: snapshot.orders_completed_today,
            orders_completed_total: snapshot.orders_completed_total,
            rng,
            observer,
            outcome: None,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Session identifier.
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Player name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Restaurant name.
    pub fn restaurant_name(&self) -> &str {
        &self.restaurant_name
    }

    /// Selected difficulty.
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current in-game day.
    pub const fn day(&self) -> u32 {
        self.clock.day()
    }

    /// Current hour of day.
    pub const fn hour(&self) -> u32 {
        self.clock.hour()
    }

    /// Current reputation score.
    pub const fn reputation(&self) -> Decimal {
        self.reputation.value()
    }

    /// Current balance.
    pub async fn balance(&self) -> Decimal {
        self.ledger.lock().await.balance()
    }

    /// The queue, in FIFO order.
    pub async fn order_queue(&self) -> Vec<Order> {
        self.board.snapshot().await
    }

    /// Recipes the player can currently sell.
    pub const fn unlocked_recipes(&self) -> &BTreeSet<String> {
        &self.unlocked_recipes
    }

    /// Achievements unlocked so far.
    pub const fn achievements(&self) -> &BTreeSet<Achievement> {
        self.achievements.set()
    }

    /// The menu catalog.
    pub fn menu(&self) -> &MenuCatalog {
        &self.menu
    }

    /// Effective kitchen capacity right now: derived from upgrades,
    /// scaled by active events, floored.
    pub fn kitchen_capacity(&self) -> u32 {
        kitchen::effective_capacity(
            self.upgrades.base_capacity(),
            self.events.capacity_multiplier(),
        )
    }

    /// The terminal outcome, once reached.
    pub const fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Advance the simulation by one hour.
    ///
    /// Terminal conditions are checked before any processing: a session
    /// that has already ended declines with [`EngineError::SessionOver`],
    /// and a freshly detected terminal condition short-circuits the hour
    /// and returns [`HourOutcome::Finished`].
    pub async fn advance_hour(&mut self) -> Result<HourOutcome, EngineError> {
        self.ensure_running()?;

        if let Some(outcome) = self.check_terminal().await {
            let stats = self.finish(outcome).await;
            return Ok(HourOutcome::Finished(stats));
        }

        match self.clock.advance_hour() {
            HourAdvance::EndOfDay => self.settle_day().await,
            HourAdvance::Working(hour) => self.run_working_hour(hour).await,
        }
    }

    /// Buy `quantity` units of an ingredient at its current unit cost.
    ///
    /// All-or-nothing: the debit and the stock increase happen together
    /// or not at all.
    pub async fn purchase_ingredient(
        &mut self,
        path: &str,
        quantity: u32,
    ) -> Result<IngredientPurchase, EngineError> {
        self.ensure_running()?;
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }
        let parsed = IngredientPath::parse(path)?;

        let mut stock = self.stock.lock().await;
        let unit_cost = stock
            .unit_cost(&parsed)
            .ok_or_else(|| StockError::UnknownIngredient {
                path: String::from(path),
            })?;
        let total_cost = unit_cost.saturating_mul(Decimal::from(quantity));

        let mut ledger = self.ledger.lock().await;
        ledger.subtract_money(total_cost, &format!("Buy {path} x{quantity}"))?;
        if let Err(err) = stock.add(&parsed, quantity) {
            // Undo the debit so the decline leaves state unchanged.
            let _ = ledger.add_money(total_cost, &format!("Refund {path} x{quantity}"));
            return Err(err.into());
        }
        let new_balance = ledger.balance();

        info!(path, quantity, %total_cost, "ingredient purchased");
        Ok(IngredientPurchase {
            path: String::from(path),
            quantity,
            total_cost,
            new_balance,
        })
    }

    /// Restock low ingredients automatically within a budget, settling
    /// the total through the ledger.
    ///
    /// The effective budget is capped at the current balance, so the
    /// settlement cannot be declined.
    pub async fn auto_restock(&mut self, budget: Decimal) -> Result<RestockReport, EngineError> {
        self.ensure_running()?;
        if budget <= Decimal::ZERO {
            return Err(EngineError::Ledger(LedgerError::NonPositiveAmount {
                amount: budget,
            }));
        }

        let mut stock = self.stock.lock().await;
        let mut ledger = self.ledger.lock().await;
        let effective_budget = budget.min(ledger.balance());
        let report = stock.auto_restock(effective_budget);
        if report.total_cost > Decimal::ZERO {
            ledger.subtract_money(report.total_cost, "Automatic restock")?;
        }
        Ok(report)
    }

    /// Buy an upgrade at its level-scaled price.
    pub async fn purchase_upgrade(
        &mut self,
        kind: UpgradeKind,
    ) -> Result<UpgradePurchase, EngineError> {
        self.ensure_running()?;

        let current = self.upgrades.count(kind);
        if current >= kind.max_level() {
            return Err(EngineError::UpgradeMaxed {
                kind,
                level: current,
            });
        }

        // A recipe unlock with nothing left to unlock is declined before
        // any money moves.
        let locked_secrets: Vec<String> = if kind == UpgradeKind::NewRecipe {
            let locked: Vec<String> = self
                .menu
                .secret_recipe_ids()
                .into_iter()
                .filter(|id| !self.unlocked_recipes.contains(id))
                .collect();
            if locked.is_empty() {
                return Err(EngineError::NoSecretRecipesLeft);
            }
            locked
        } else {
            Vec::new()
        };

        let cost = self
            .upgrades
            .price(kind, self.config.upgrades.base_cost(kind));
        let new_balance = {
            let mut ledger = self.ledger.lock().await;
            ledger.subtract_money(cost, &format!("Upgrade: {kind}"))?
        };
        let level = self.upgrades.record(kind)?;

        let unlocked_recipe = if kind == UpgradeKind::NewRecipe {
            let index = self.rng.random_range(0..locked_secrets.len());
            locked_secrets.get(index).map(|id| {
                self.unlocked_recipes.insert(id.clone());
                info!(recipe = id, "secret recipe unlocked");
                id.clone()
            })
        } else {
            None
        };

        match (kind, level) {
            (UpgradeKind::UpgradeKitchen, 3..) => self.grant(Achievement::KitchenVeteran),
            (UpgradeKind::NewEmployee, 2..) => self.grant(Achievement::SmallTeam),
            _ => {}
        }

        info!(upgrade = %kind, level, %cost, "upgrade purchased");
        let receipt = UpgradePurchase {
            kind,
            level,
            cost,
            new_balance,
            base_capacity: self.upgrades.base_capacity(),
            unlocked_recipe,
        };

        self.checkpoint().await;
        Ok(receipt)
    }

    /// Assemble the current snapshot.
    pub async fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id,
            player_name: self.player_name.clone(),
            restaurant_name: self.restaurant_name.clone(),
            difficulty: self.difficulty,
            day: self.clock.day(),
            hour: self.clock.hour(),
            reputation: self.reputation.value(),
            upgrade_counts: self.upgrades.counts().clone(),
            unlocked_recipes: self.unlocked_recipes.clone(),
            achievements: self.achievements.set().clone(),
            order_queue: self.board.snapshot().await,
            next_order_id: self.board.next_id(),
            active_events: self.events.active().clone(),
            hours_since_last_event: self.events.hours_since_last(),
            next_event_interval: self.events.next_interval(),
            orders_completed_today: self.orders_completed_today,
            orders_completed_total: self.orders_completed_total,
            ledger: self.ledger.lock().await.snapshot(),
            stock_quantities: self.stock.lock().await.quantities(),
            saved_at: Utc::now(),
        }
    }

    /// Push a snapshot checkpoint to the observer.
    pub async fn checkpoint(&mut self) {
        let snapshot = self.snapshot().await;
        self.observer.on_snapshot(&snapshot);
    }

    // -----------------------------------------------------------------------
    // Hour pipeline
    // -----------------------------------------------------------------------

    async fn run_working_hour(&mut self, hour: u32) -> Result<HourOutcome, EngineError> {
        // Expire events first so a lapsed multiplier does not shape this
        // hour, then roll for a new one.
        let _expired = self.events.expire_tick();
        if let Some(activation) = self.events.maybe_trigger(&mut self.rng) {
            self.apply_event_effect(&activation).await;
        }

        let arrivals = self.simulate_arrivals(hour).await;

        let capacity = self.kitchen_capacity();
        let summary = {
            let board = Arc::clone(&self.board);
            let menu = Arc::clone(&self.menu);
            let mut stock = self.stock.lock().await;
            let mut ledger = self.ledger.lock().await;
            let reputation = &mut self.reputation;
            let order_timeout = self.config.gameplay.order_timeout;
            board
                .with_queue(|queue| {
                    kitchen::run_shift(&mut KitchenShift {
                        queue,
                        menu: &menu,
                        stock: &mut stock,
                        ledger: &mut ledger,
                        reputation,
                        capacity,
                        current_hour: hour,
                        order_timeout,
                    })
                })
                .await
        };

        for _ in &summary.completed {
            self.orders_completed_today = self.orders_completed_today.saturating_add(1);
            self.orders_completed_total = self.orders_completed_total.saturating_add(1);
            if self.orders_completed_total == 1 {
                self.grant(Achievement::FirstSale);
            }
            if self.orders_completed_total == 10 {
                self.grant(Achievement::TenthSale);
            }
            if self.orders_completed_today >= 5 {
                self.grant(Achievement::FiveOrdersInADay);
            }
        }
        if self.reputation.is_maxed() {
            self.grant(Achievement::ReputationMaxed);
        }

        let report = HourlyReport {
            day: self.clock.day(),
            hour,
            balance: self.balance().await,
            reputation: self.reputation.value(),
            capacity,
            new_orders: u32::try_from(arrivals.len()).unwrap_or(u32::MAX),
            units_prepared: summary.units_prepared,
            orders_completed: summary.completed,
            orders_expired: summary.expired,
            queue: self.board.snapshot().await,
            active_events: self.events.active().clone(),
        };

        self.observer.on_hour(&report);
        self.checkpoint().await;
        Ok(HourOutcome::Hour(report))
    }

    async fn settle_day(&mut self) -> Result<HourOutcome, EngineError> {
        let day = self.clock.day();
        let close = self.ledger.lock().await.apply_daily_costs(day);

        let settlement = match close {
            DayCloseOutcome::Bankrupt {
                critical_due,
                available,
                ..
            } => {
                warn!(%critical_due, %available, "bankrupt on critical daily costs");
                let stats = self.finish(GameOutcome::Bankruptcy).await;
                return Ok(HourOutcome::Finished(stats));
            }
            DayCloseOutcome::Settled(settlement) => settlement,
            DayCloseOutcome::UpToDate => {
                // Nothing was due; synthesize an empty settlement.
                let ledger = self.ledger.lock().await;
                DailySettlement {
                    total_cost: Decimal::ZERO,
                    days_passed: 0,
                    breakdown: std::collections::BTreeMap::new(),
                    skipped: Vec::new(),
                    new_balance: ledger.balance(),
                    day_number: ledger.days_in_operation(),
                }
            }
        };

        if let Some(outcome) = self.check_terminal().await {
            let stats = self.finish(outcome).await;
            return Ok(HourOutcome::Finished(stats));
        }

        if self.clock.is_final_day() {
            let stats = self.finish(GameOutcome::Victory).await;
            return Ok(HourOutcome::Finished(stats));
        }

        let report = DayReport {
            day,
            settlement,
            balance: self.balance().await,
            reputation: self.reputation.value(),
            orders_completed: self.orders_completed_today,
        };

        // Roll onto the next day: fresh queue, fresh counters.
        let next_day = self.clock.start_next_day();
        self.board.clear().await;
        self.orders_completed_today = 0;
        self.events.reset_counter();
        info!(day = next_day, "day started");

        self.observer.on_day_end(&report);
        self.checkpoint().await;
        Ok(HourOutcome::DayEnded(report))
    }

    async fn simulate_arrivals(&mut self, hour: u32) -> Vec<Order> {
        let queue_cap = usize::try_from(
            self.config
                .gameplay
                .max_concurrent_orders
                .saturating_mul(QUEUE_CAP_FACTOR),
        )
        .unwrap_or(usize::MAX);

        if self.board.len().await >= queue_cap {
            info!("queue full, new customers turned away");
            return Vec::new();
        }
        // No new customers at closing time.
        if hour >= self.clock.working_end() {
            return Vec::new();
        }

        let level = self.config.difficulty_level(self.difficulty);
        let chance = level
            .customer_frequency
            .saturating_mul(BASE_ARRIVAL_CHANCE)
            .saturating_mul(self.reputation.arrival_factor())
            .saturating_mul(self.events.customer_multiplier());

        let count = orders::roll_arrival_count(chance, &mut self.rng);
        if count == 0 {
            return Vec::new();
        }

        let max_units = self
            .config
            .gameplay
            .max_burgers_per_order
            .min(UNITS_PER_ORDER_CAP)
            .max(1);

        let ctx = ArrivalContext {
            board: Arc::clone(&self.board),
            menu: Arc::clone(&self.menu),
            stock: Arc::clone(&self.stock),
            unlocked: Arc::new(self.unlocked_recipes.clone()),
            max_units,
            arrival_hour: hour,
            queue_cap,
        };
        let placed = orders::spawn_customers(ctx, count).await;
        if !placed.is_empty() {
            info!(count = placed.len(), hour, "orders arrived");
        }
        placed
    }

    async fn apply_event_effect(&mut self, activation: &Activation) {
        let memo = format!("Event: {}", activation.event);
        if let Some((kind, amount)) = activation.effect.cash {
            let mut ledger = self.ledger.lock().await;
            let applied = match kind {
                TransactionKind::Revenue => ledger.add_money(amount, &memo),
                TransactionKind::Expense => ledger.subtract_money(amount, &memo),
            };
            if let Err(declined) = applied {
                // An unaffordable penalty is skipped, not forced.
                warn!(event = %activation.event, %declined, "event cash effect not applied");
            }
        }
        if activation.effect.reputation_delta != Decimal::ZERO {
            self.reputation.adjust(activation.effect.reputation_delta);
        }
    }

    // -----------------------------------------------------------------------
    // Terminal handling
    // -----------------------------------------------------------------------

    const fn ensure_running(&self) -> Result<(), EngineError> {
        match self.outcome {
            Some(outcome) => Err(EngineError::SessionOver { outcome }),
            None => Ok(()),
        }
    }

    async fn check_terminal(&self) -> Option<GameOutcome> {
        if self.balance().await <= Decimal::ZERO {
            return Some(GameOutcome::Bankruptcy);
        }
        if self.reputation.is_depleted() {
            return Some(GameOutcome::ReputationCollapse);
        }
        None
    }

    async fn finish(&mut self, outcome: GameOutcome) -> FinalStats {
        self.outcome = Some(outcome);
        let stats = FinalStats {
            outcome,
            day: self.clock.day(),
            balance: self.balance().await,
            reputation: self.reputation.value(),
            orders_completed_total: self.orders_completed_total,
            upgrades_purchased: self.upgrades.total_purchases(),
            achievements: self.achievements.set().clone(),
        };
        info!(outcome = %outcome, day = stats.day, balance = %stats.balance, "session over");
        self.observer.on_game_over(&stats);
        self.checkpoint().await;
        stats
    }

    fn grant(&mut self, achievement: Achievement) {
        if self.achievements.unlock(achievement) {
            info!(achievement = %achievement, "achievement unlocked");
            self.observer.on_achievement(achievement);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use griddle_menu::RecipeSpec;
    use griddle_stock::IngredientSpec;

    use crate::config::{DifficultyLevel, GameplayConfig, TimeConfig, UpgradeCosts};
    use crate::observer::NoOpObserver;

    use super::*;

    fn ingredient(name: &str, cost: Decimal, initial: u32) -> IngredientSpec {
        IngredientSpec {
            display_name: String::from(name),
            base_cost: cost,
            initial_quantity: initial,
            reorder_point: 5,
            restock_quantity: 10,
            critical: false,
        }
    }

    /// A config with one base recipe, one secret recipe, a saturated
    /// arrival chance (exactly one order per hour), and events off.
    fn test_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.economy.initial_balance = dec!(500);
        config.gameplay = GameplayConfig {
            seed: 1,
            max_concurrent_orders: 10,
            customer_patience: 50,
            max_burgers_per_order: 1,
            order_timeout: 6,
            initial_reputation: dec!(50),
            hour_interval_ms: 0,
        };
        config.time = TimeConfig {
            working_start: 8,
            working_end: 12,
            days: 2,
        };
        config.events.enabled = false;
        config.upgrades = UpgradeCosts {
            upgrade_kitchen: dec!(100),
            new_employee: dec!(50),
            new_recipe: dec!(100),
        };
        // Frequency 16 -> chance = 16 * 0.25 * 0.5 = 2.0, which lands
        // every roll in the first band: exactly one order per hour.
        config.difficulty.levels.insert(
            Difficulty::Easy,
            DifficultyLevel {
                customer_frequency: dec!(16),
                order_complexity: Decimal::ONE,
                profit: Decimal::ONE,
                event_frequency: Decimal::ONE,
            },
        );
        config.ingredients = BTreeMap::from([
            (
                String::from("hamburger"),
                BTreeMap::from([(String::from("beef"), ingredient("Beef Patty", dec!(1.5), 50))]),
            ),
            (
                String::from("bread"),
                BTreeMap::from([(String::from("bun"), ingredient("Bun", dec!(0.5), 50))]),
            ),
            (
                String::from("secret"),
                BTreeMap::from([(
                    String::from("truffle"),
                    ingredient("Black Truffle", dec!(5.0), 5),
                )]),
            ),
        ]);
        config.recipes = BTreeMap::from([
            (
                String::from("classic"),
                RecipeSpec {
                    name: String::from("Classic Burger"),
                    ingredients: BTreeMap::from([
                        (String::from("hamburger.beef"), 1),
                        (String::from("bread.bun"), 1),
                    ]),
                    cost: dec!(2.0),
                    price: dec!(6.0),
                },
            ),
            (
                String::from("truffle_royale"),
                RecipeSpec {
                    name: String::from("Truffle Royale"),
                    ingredients: BTreeMap::from([
                        (String::from("hamburger.beef"), 1),
                        (String::from("secret.truffle"), 1),
                    ]),
                    cost: dec!(7.0),
                    price: dec!(18.0),
                },
            ),
        ]);
        config
    }

    fn params() -> NewGameParams {
        NewGameParams {
            player_name: String::from("Sam"),
            restaurant_name: String::from("Griddle House"),
            difficulty: Difficulty::Easy,
        }
    }

    fn engine_with(config: GameConfig) -> GameEngine {
        GameEngine::new_game(config, params(), Box::new(NoOpObserver)).unwrap()
    }

    fn expect_hour(outcome: HourOutcome) -> HourlyReport {
        match outcome {
            HourOutcome::Hour(report) => report,
            other => panic!("expected a working hour, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_game_starts_at_window_open_with_base_recipes() {
        let engine = engine_with(test_config());
        assert_eq!(engine.day(), 1);
        assert_eq!(engine.hour(), 8);
        assert_eq!(engine.balance().await, dec!(500));
        assert_eq!(engine.reputation(), dec!(50));
        assert_eq!(engine.kitchen_capacity(), 1);
        // Only the non-secret recipe starts unlocked.
        assert_eq!(
            engine.unlocked_recipes().iter().cloned().collect::<Vec<_>>(),
            vec![String::from("classic")]
        );
        assert!(engine.outcome().is_none());
    }

    #[tokio::test]
    async fn working_hour_takes_and_completes_one_order() {
        let mut engine = engine_with(test_config());
        let report = expect_hour(engine.advance_hour().await.unwrap());

        assert_eq!(report.day, 1);
        assert_eq!(report.hour, 9);
        assert_eq!(report.new_orders, 1);
        assert_eq!(report.units_prepared, 1);
        assert_eq!(report.orders_completed.len(), 1);
        assert!(report.queue.is_empty());
        // 6.00 * 1.0 - 2.00 = 4.00 net on the sale.
        assert_eq!(report.balance, dec!(504.0));
        // +5 for the completed order.
        assert_eq!(report.reputation, dec!(55));
        assert!(engine.achievements().contains(&Achievement::FirstSale));
    }

    #[tokio::test]
    async fn day_end_settles_costs_and_rolls_over() {
        let mut config = test_config();
        config.time.working_end = 10;
        let mut engine = engine_with(config);

        // Hours 9 and 10, then the window is exhausted.
        let _ = engine.advance_hour().await.unwrap();
        let _ = engine.advance_hour().await.unwrap();
        let outcome = engine.advance_hour().await.unwrap();

        let HourOutcome::DayEnded(report) = outcome else {
            panic!("expected day end, got {outcome:?}");
        };
        assert_eq!(report.day, 1);
        assert_eq!(report.settlement.total_cost, dec!(160));
        assert_eq!(report.settlement.days_passed, 1);
        // One sale at hour 9 (no arrivals at closing hour): 504 - 160.
        assert_eq!(report.balance, dec!(344.0));
        assert_eq!(report.orders_completed, 1);

        assert_eq!(engine.day(), 2);
        assert_eq!(engine.hour(), 8);
        assert!(engine.order_queue().await.is_empty());
    }

    #[tokio::test]
    async fn final_day_completion_is_victory() {
        let mut config = test_config();
        config.time.working_end = 9;
        config.time.days = 1;
        let mut engine = engine_with(config);

        let _ = engine.advance_hour().await.unwrap();
        let outcome = engine.advance_hour().await.unwrap();

        let HourOutcome::Finished(stats) = outcome else {
            panic!("expected the session to finish, got {outcome:?}");
        };
        assert_eq!(stats.outcome, GameOutcome::Victory);
        assert!(stats.outcome.is_victory());
        assert_eq!(engine.outcome(), Some(GameOutcome::Victory));

        // The session is over; further advances are declined.
        assert!(matches!(
            engine.advance_hour().await,
            Err(EngineError::SessionOver { .. })
        ));
    }

    #[tokio::test]
    async fn unaffordable_critical_costs_end_in_bankruptcy() {
        let mut config = test_config();
        config.economy.initial_balance = dec!(30);
        config.time.working_end = 9;
        // No customers, so nothing improves the balance.
        config.difficulty.levels.insert(
            Difficulty::Easy,
            DifficultyLevel {
                customer_frequency: Decimal::ZERO,
                order_complexity: Decimal::ONE,
                profit: Decimal::ONE,
                event_frequency: Decimal::ONE,
            },
        );
        let mut engine = engine_with(config);

        let _ = engine.advance_hour().await.unwrap();
        let outcome = engine.advance_hour().await.unwrap();

        let HourOutcome::Finished(stats) = outcome else {
            panic!("expected bankruptcy, got {outcome:?}");
        };
        assert_eq!(stats.outcome, GameOutcome::Bankruptcy);
        // Nothing was charged on the failed settlement.
        assert_eq!(stats.balance, dec!(30));
    }

    #[tokio::test]
    async fn depleted_reputation_collapses_before_any_hour() {
        let mut config = test_config();
        config.gameplay.initial_reputation = Decimal::ZERO;
        let mut engine = engine_with(config);

        let outcome = engine.advance_hour().await.unwrap();
        let HourOutcome::Finished(stats) = outcome else {
            panic!("expected reputation collapse, got {outcome:?}");
        };
        assert_eq!(stats.outcome, GameOutcome::ReputationCollapse);
    }

    #[tokio::test]
    async fn ingredient_purchase_debits_and_stocks() {
        let mut engine = engine_with(test_config());
        let receipt = engine.purchase_ingredient("hamburger.beef", 10).await.unwrap();
        assert_eq!(receipt.total_cost, dec!(15.0));
        assert_eq!(receipt.new_balance, dec!(485.0));
        assert_eq!(engine.balance().await, dec!(485.0));
    }

    #[tokio::test]
    async fn ingredient_purchase_declines_cleanly() {
        let mut engine = engine_with(test_config());

        assert!(matches!(
            engine.purchase_ingredient("hamburger.beef", 0).await,
            Err(EngineError::InvalidQuantity)
        ));
        assert!(matches!(
            engine.purchase_ingredient("not-a-path", 1).await,
            Err(EngineError::Stock(_))
        ));
        assert!(matches!(
            engine.purchase_ingredient("hamburger.wagyu", 1).await,
            Err(EngineError::Stock(_))
        ));
        // 1000 beef at 1.5 needs 1500, more than the balance.
        assert!(matches!(
            engine.purchase_ingredient("hamburger.beef", 1000).await,
            Err(EngineError::Ledger(LedgerError::InsufficientFunds { .. }))
        ));
        // Every decline left the balance untouched.
        assert_eq!(engine.balance().await, dec!(500));
    }

    #[tokio::test]
    async fn kitchen_upgrade_raises_derived_capacity() {
        let mut engine = engine_with(test_config());
        let receipt = engine
            .purchase_upgrade(UpgradeKind::UpgradeKitchen)
            .await
            .unwrap();
        assert_eq!(receipt.level, 1);
        assert_eq!(receipt.cost, dec!(100));
        assert_eq!(receipt.base_capacity, 2);
        assert_eq!(engine.kitchen_capacity(), 2);

        // The next level costs 15% more.
        let receipt = engine
            .purchase_upgrade(UpgradeKind::UpgradeKitchen)
            .await
            .unwrap();
        assert_eq!(receipt.cost, dec!(115.00));
        assert_eq!(engine.kitchen_capacity(), 3);
    }

    #[tokio::test]
    async fn recipe_unlock_reveals_the_secret_recipe_once() {
        let mut engine = engine_with(test_config());
        let receipt = engine.purchase_upgrade(UpgradeKind::NewRecipe).await.unwrap();
        assert_eq!(receipt.unlocked_recipe, Some(String::from("truffle_royale")));
        assert!(engine.unlocked_recipes().contains("truffle_royale"));

        // One-shot: a second unlock is declined at the level cap.
        assert!(matches!(
            engine.purchase_upgrade(UpgradeKind::NewRecipe).await,
            Err(EngineError::UpgradeMaxed { .. })
        ));
    }

    #[tokio::test]
    async fn recipe_unlock_declines_with_no_secrets_before_paying() {
        let mut config = test_config();
        config.recipes.remove("truffle_royale");
        let mut engine = engine_with(config);

        assert!(matches!(
            engine.purchase_upgrade(UpgradeKind::NewRecipe).await,
            Err(EngineError::NoSecretRecipesLeft)
        ));
        assert_eq!(engine.balance().await, dec!(500));
    }

    #[tokio::test]
    async fn auto_restock_buys_low_items_within_budget() {
        let mut config = test_config();
        if let Some(category) = config.ingredients.get_mut("hamburger") {
            if let Some(beef) = category.get_mut("beef") {
                beef.initial_quantity = 1;
                beef.reorder_point = 6;
                beef.restock_quantity = 4;
            }
        }
        let mut engine = engine_with(config);

        let report = engine.auto_restock(dec!(50)).await.unwrap();
        assert_eq!(report.restocked, vec![(String::from("Beef Patty"), 4)]);
        assert_eq!(report.total_cost, dec!(6.0));
        assert_eq!(engine.balance().await, dec!(494.0));
    }

    #[tokio::test]
    async fn snapshot_roundtrip_resumes_the_session() {
        let mut engine = engine_with(test_config());
        let _ = engine.advance_hour().await.unwrap();
        let snapshot = engine.snapshot().await;

        let mut restored =
            GameEngine::load_game(test_config(), snapshot, Box::new(NoOpObserver)).unwrap();
        assert_eq!(restored.day(), engine.day());
        assert_eq!(restored.hour(), engine.hour());
        assert_eq!(restored.balance().await, engine.balance().await);
        assert_eq!(restored.reputation(), engine.reputation());
        assert_eq!(
            restored.unlocked_recipes(),
            engine.unlocked_recipes()
        );

        // The restored session keeps simulating from the next hour.
        let report = expect_hour(restored.advance_hour().await.unwrap());
        assert_eq!(report.hour, 10);
    }
}

