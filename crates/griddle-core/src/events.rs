//! Random special events: trigger rolls, immediate effects, durations.
//!
//! Every working hour the engine ticks an hours-since-last-event
//! counter. When it reaches the current interval (re-rolled uniformly
//! within the configured bounds after every activation), a category is
//! chosen by weighted roll and a concrete event uniformly among the
//! enabled events of that category. The event stays active for the
//! configured duration, imposing its customer/capacity multipliers; its
//! one-time cash and reputation effects are rolled here and applied by
//! the engine.
//!
//! If the rolled category has no enabled events (the neutral category
//! ships empty), nothing activates and the counter keeps running, so the
//! next hour rolls again.

use std::collections::BTreeMap;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info};

use griddle_types::{EventCategory, SpecialEvent, TransactionKind};

use crate::config::EventsConfig;

/// One-time effect applied at event activation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImmediateEffect {
    /// Cash movement, if any: direction and amount.
    pub cash: Option<(TransactionKind, Decimal)>,
    /// Reputation delta, if any.
    pub reputation_delta: Decimal,
}

/// An event that just fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The event.
    pub event: SpecialEvent,
    /// Hours it will stay active.
    pub duration: u32,
    /// Its rolled one-time effect.
    pub effect: ImmediateEffect,
}

/// Event scheduling and active-event state.
#[derive(Debug, Clone)]
pub struct EventEngine {
    config: EventsConfig,
    active: BTreeMap<SpecialEvent, u32>,
    hours_since_last: u32,
    next_interval: u32,
}

impl EventEngine {
    /// Create the event engine, rolling the first interval.
    pub fn new(config: EventsConfig, rng: &mut impl Rng) -> Self {
        let next_interval = roll_interval(&config, rng);
        Self {
            config,
            active: BTreeMap::new(),
            hours_since_last: 0,
            next_interval,
        }
    }

    /// Restore scheduling state from a snapshot.
    pub fn restore(
        &mut self,
        active: BTreeMap<SpecialEvent, u32>,
        hours_since_last: u32,
        next_interval: u32,
    ) {
        self.active = active;
        self.hours_since_last = hours_since_last;
        self.next_interval = next_interval.max(1);
    }

    /// Currently active events and their remaining hours.
    pub const fn active(&self) -> &BTreeMap<SpecialEvent, u32> {
        &self.active
    }

    /// Hours since the last activation.
    pub const fn hours_since_last(&self) -> u32 {
        self.hours_since_last
    }

    /// Hours until the next trigger roll.
    pub const fn next_interval(&self) -> u32 {
        self.next_interval
    }

    /// Reset the counter at day rollover.
    pub const fn reset_counter(&mut self) {
        self.hours_since_last = 0;
    }

    /// Decrement every active event; remove and return the expired ones.
    ///
    /// Capacity restoration is implicit: effective capacity is derived
    /// from upgrades and the active multipliers at every use, so removing
    /// the event removes its effect.
    pub fn expire_tick(&mut self) -> Vec<SpecialEvent> {
        let mut expired = Vec::new();
        for (event, remaining) in &mut self.active {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                expired.push(*event);
            }
        }
        for event in &expired {
            self.active.remove(event);
            info!(event = %event, "event expired");
        }
        expired
    }

    /// Tick the trigger counter; possibly activate an event.
    ///
    /// Returns the activation (already registered as active) or `None`.
    pub fn maybe_trigger(&mut self, rng: &mut impl Rng) -> Option<Activation> {
        if !self.config.enabled {
            return None;
        }

        self.hours_since_last = self.hours_since_last.saturating_add(1);
        if self.hours_since_last < self.next_interval {
            return None;
        }

        let category = self.roll_category(rng);
        let candidates: Vec<SpecialEvent> = SpecialEvent::ALL
            .into_iter()
            .filter(|event| event.category() == category)
            .filter(|event| self.is_enabled(*event))
            .collect();

        let picked = pick_uniform(&candidates, rng)?;

        self.active.insert(picked, self.config.event_duration.max(1));
        self.hours_since_last = 0;
        self.next_interval = roll_interval(&self.config, rng);

        let effect = roll_effect(picked, rng);
        info!(event = %picked, duration = self.config.event_duration, "event activated");

        Some(Activation {
            event: picked,
            duration: self.config.event_duration.max(1),
            effect,
        })
    }

    /// Product of the customer multipliers of all active events.
    pub fn customer_multiplier(&self) -> Decimal {
        self.active
            .keys()
            .fold(Decimal::ONE, |acc, event| {
                acc.saturating_mul(event.customer_multiplier())
            })
    }

    /// Product of the capacity multipliers of all active events.
    pub fn capacity_multiplier(&self) -> Decimal {
        self.active
            .keys()
            .fold(Decimal::ONE, |acc, event| {
                acc.saturating_mul(event.capacity_multiplier())
            })
    }

    fn is_enabled(&self, event: SpecialEvent) -> bool {
        self.config
            .special_events
            .get(event.key())
            .copied()
            .unwrap_or(true)
    }

    fn roll_category(&self, rng: &mut impl Rng) -> EventCategory {
        let weights = &self.config.probabilities;
        let total = weights
            .positive
            .saturating_add(weights.negative)
            .saturating_add(weights.neutral);
        if total == 0 {
            return EventCategory::Neutral;
        }
        let roll: u32 = rng.random_range(0..total);
        if roll < weights.positive {
            EventCategory::Positive
        } else if roll < weights.positive.saturating_add(weights.negative) {
            EventCategory::Negative
        } else {
            EventCategory::Neutral
        }
    }
}

/// Roll the next trigger interval uniformly within the configured bounds.
fn roll_interval(config: &EventsConfig, rng: &mut impl Rng) -> u32 {
    let min = config.min_interval.max(1);
    let max = config.max_interval.max(min);
    rng.random_range(min..=max)
}

/// Uniform pick from a slice, `None` when empty.
fn pick_uniform(candidates: &[SpecialEvent], rng: &mut impl Rng) -> Option<SpecialEvent> {
    if candidates.is_empty() {
        debug!("no enabled events in rolled category");
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    candidates.get(index).copied()
}

/// Roll a cash amount in cents over an inclusive range.
fn cash_cents(rng: &mut impl Rng, low: i64, high: i64) -> Decimal {
    Decimal::new(rng.random_range(low..=high), 2)
}

/// Roll the one-time cash/reputation effect for an event.
fn roll_effect(event: SpecialEvent, rng: &mut impl Rng) -> ImmediateEffect {
    match event {
        SpecialEvent::FoodCritic => ImmediateEffect {
            cash: Some((
                TransactionKind::Revenue,
                cash_cents(rng, 15_000, 40_000),
            )),
            reputation_delta: Decimal::new(15, 0),
        },
        SpecialEvent::HealthInspection => ImmediateEffect {
            cash: Some((
                TransactionKind::Expense,
                cash_cents(rng, 10_000, 35_000),
            )),
            reputation_delta: Decimal::new(-15, 0),
        },
        SpecialEvent::LuckyDay => ImmediateEffect {
            cash: Some((
                TransactionKind::Revenue,
                cash_cents(rng, 20_000, 50_000),
            )),
            reputation_delta: Decimal::ZERO,
        },
        SpecialEvent::BrokenEquipment => ImmediateEffect {
            cash: Some((
                TransactionKind::Expense,
                cash_cents(rng, 25_000, 60_000),
            )),
            reputation_delta: Decimal::ZERO,
        },
        SpecialEvent::Theft => ImmediateEffect {
            cash: Some((
                TransactionKind::Expense,
                cash_cents(rng, 10_000, 25_000),
            )),
            reputation_delta: Decimal::ZERO,
        },
        SpecialEvent::RushHour | SpecialEvent::BadWeather | SpecialEvent::EmployeeSick => {
            ImmediateEffect::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    use crate::config::EventWeights;

    use super::*;

    fn config(min: u32, max: u32) -> EventsConfig {
        EventsConfig {
            enabled: true,
            min_interval: min,
            max_interval: max,
            event_duration: 3,
            probabilities: EventWeights {
                positive: 1,
                negative: 0,
                neutral: 0,
            },
            special_events: BTreeMap::new(),
        }
    }

    #[test]
    fn no_trigger_before_the_interval() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut events = EventEngine::new(config(3, 3), &mut rng);
        assert!(events.maybe_trigger(&mut rng).is_none());
        assert!(events.maybe_trigger(&mut rng).is_none());
        // Third tick reaches the interval.
        let activation = events.maybe_trigger(&mut rng);
        assert!(activation.is_some());
        assert_eq!(events.hours_since_last(), 0);
    }

    #[test]
    fn positive_only_weights_pick_positive_events() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut events = EventEngine::new(config(1, 1), &mut rng);
        for _ in 0..20 {
            if let Some(activation) = events.maybe_trigger(&mut rng) {
                assert_eq!(activation.event.category(), EventCategory::Positive);
                events.active.clear();
            }
        }
    }

    #[test]
    fn disabled_events_are_never_picked() {
        let mut cfg = config(1, 1);
        cfg.special_events = BTreeMap::from([
            (String::from("rush_hour"), false),
            (String::from("food_critic"), false),
        ]);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut events = EventEngine::new(cfg, &mut rng);
        for _ in 0..20 {
            if let Some(activation) = events.maybe_trigger(&mut rng) {
                assert_eq!(activation.event, SpecialEvent::LuckyDay);
                events.active.clear();
            }
        }
    }

    #[test]
    fn empty_category_leaves_counter_running() {
        let mut cfg = config(2, 2);
        // Neutral category only, which has no events.
        cfg.probabilities = EventWeights {
            positive: 0,
            negative: 0,
            neutral: 1,
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let mut events = EventEngine::new(cfg, &mut rng);
        let _ = events.maybe_trigger(&mut rng);
        assert!(events.maybe_trigger(&mut rng).is_none());
        // Counter was not reset, so the next tick rolls again.
        assert!(events.hours_since_last() >= 2);
    }

    #[test]
    fn master_toggle_disables_everything() {
        let mut cfg = config(1, 1);
        cfg.enabled = false;
        let mut rng = SmallRng::seed_from_u64(9);
        let mut events = EventEngine::new(cfg, &mut rng);
        for _ in 0..10 {
            assert!(events.maybe_trigger(&mut rng).is_none());
        }
    }

    #[test]
    fn expiry_decrements_and_removes() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut events = EventEngine::new(config(1, 1), &mut rng);
        events.active.insert(SpecialEvent::RushHour, 2);

        assert!(events.expire_tick().is_empty());
        assert_eq!(events.active().get(&SpecialEvent::RushHour), Some(&1));
        assert_eq!(events.expire_tick(), vec![SpecialEvent::RushHour]);
        assert!(events.active().is_empty());
    }

    #[test]
    fn multipliers_combine_active_events() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut events = EventEngine::new(config(1, 1), &mut rng);
        assert_eq!(events.customer_multiplier(), Decimal::ONE);

        events.active.insert(SpecialEvent::RushHour, 3);
        assert_eq!(events.customer_multiplier(), dec!(2.5));
        assert_eq!(events.capacity_multiplier(), Decimal::ONE);

        events.active.insert(SpecialEvent::EmployeeSick, 3);
        assert_eq!(events.capacity_multiplier(), dec!(0.5));
    }

    #[test]
    fn critic_effect_carries_cash_and_reputation() {
        let mut rng = SmallRng::seed_from_u64(11);
        let effect = roll_effect(SpecialEvent::FoodCritic, &mut rng);
        let (kind, amount) = effect.cash.unwrap();
        assert_eq!(kind, TransactionKind::Revenue);
        assert!(amount >= dec!(150) && amount <= dec!(400));
        assert_eq!(effect.reputation_delta, dec!(15));
    }

    #[test]
    fn rush_hour_has_no_immediate_effect() {
        let mut rng = SmallRng::seed_from_u64(11);
        let effect = roll_effect(SpecialEvent::RushHour, &mut rng);
        assert!(effect.cash.is_none());
        assert_eq!(effect.reputation_delta, Decimal::ZERO);
    }
}
