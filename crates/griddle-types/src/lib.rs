//! Shared type definitions for the griddle restaurant simulation.
//!
//! This crate is the single source of truth for the types that cross
//! crate boundaries: identifiers, enumerations, entity structs, report
//! payloads, and the snapshot shape consumed by the persistence layer.
//!
//! # Modules
//!
//! - [`ids`] -- session and order identifiers
//! - [`enums`] -- difficulty, events, costs, upgrades, achievements, outcomes
//! - [`structs`] -- orders, ledger records, reports, and [`GameSnapshot`]

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Achievement, DailyCostKind, Difficulty, EventCategory, GameOutcome, SpecialEvent,
    TransactionKind, UpgradeKind,
};
pub use ids::{GameId, OrderId};
pub use structs::{
    DailySettlement, DailyStats, DayReport, FinalStats, GameSnapshot, HourlyReport,
    LedgerSnapshot, LifetimeStats, Order, Profitability, RestockReport, SaleBreakdown,
    ShortfallItem, StockShortfall, Transaction,
};
