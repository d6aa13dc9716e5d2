//! Daily settlement records for an asset unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Model;

/// Holding direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Long,
    Short,
}

/// One open position at settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument identifier.
    pub order_book_id: String,
    /// Holding direction.
    pub direction: Direction,
    /// Held quantity.
    pub quantity: f64,
}

impl Position {
    pub fn new(order_book_id: impl Into<String>, direction: Direction, quantity: f64) -> Self {
        Self {
            order_book_id: order_book_id.into(),
            direction,
            quantity,
        }
    }
}

impl Model for Position {}

/// End-of-day settlement snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementInfo {
    /// Settlement date.
    pub date: NaiveDate,
    /// Total equity after settlement.
    pub total_equity: f64,
    /// Cash balance after settlement.
    pub cash: f64,
    /// Open positions, in reporting order.
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl SettlementInfo {
    pub fn new(date: NaiveDate, total_equity: f64, cash: f64, positions: Vec<Position>) -> Self {
        Self {
            date,
            total_equity,
            cash,
            positions,
        }
    }
}

impl Model for SettlementInfo {}
