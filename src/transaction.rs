// 🧾 Transaction - the single domain entity
// Built once by the parser from one input line, read-only afterwards

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column order of the pipe-delimited sales file
pub const SALES_HEADER: [&str; 8] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
];

/// Date layout used by the sales file
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One sales event
///
/// Fields are public so validation can be exercised on hand-built
/// records; quantity and price are signed for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,

    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "ProductID")]
    pub product_id: String,

    #[serde(rename = "ProductName")]
    pub product_name: String,

    #[serde(rename = "Quantity")]
    pub quantity: i64,

    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,

    #[serde(rename = "CustomerID")]
    pub customer_id: String,

    #[serde(rename = "Region")]
    pub region: String,
}

impl Transaction {
    /// Revenue of this record: quantity × unit price
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    /// Date rendered back in `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Render a decimal the way the sales file stores it: always with a
/// fractional part (`200.0`, `0.5`).
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// ============================================================================
// TESTS
// ============================================================================
