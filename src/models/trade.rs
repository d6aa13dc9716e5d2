//! Trade records appended to a portfolio.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::codec::compact_datetime;
use crate::models::Model;

/// Order side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
    BuyOpen,
    BuyClose,
    BuyCloseToday,
    SellOpen,
    SellClose,
    SellCloseToday,
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution id, unique within a portfolio.
    pub exec_id: String,
    /// Execution time.
    #[serde(with = "compact_datetime")]
    pub datetime: NaiveDateTime,
    /// Instrument identifier.
    pub order_book_id: String,
    /// Order side.
    pub side: Side,
    /// Filled quantity.
    pub last_quantity: f64,
    /// Fill price.
    pub last_price: f64,
    /// Total transaction cost.
    pub transaction_cost: f64,
}

impl Trade {
    pub fn new(
        exec_id: impl Into<String>,
        datetime: NaiveDateTime,
        order_book_id: impl Into<String>,
        side: Side,
        last_quantity: f64,
        last_price: f64,
        transaction_cost: f64,
    ) -> Self {
        Self {
            exec_id: exec_id.into(),
            datetime,
            order_book_id: order_book_id.into(),
            side,
            last_quantity,
            last_price,
            transaction_cost,
        }
    }
}

impl Model for Trade {}
