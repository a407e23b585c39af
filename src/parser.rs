// 🏗️ Record Parser - pipe-delimited sales lines → typed transactions
// Malformed rows are dropped and counted, never fatal

use crate::transaction::{Transaction, DATE_FORMAT};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Field separator of the sales file
pub const FIELD_DELIMITER: char = '|';

/// Every sales line carries exactly this many fields
pub const FIELD_COUNT: usize = 8;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Why a single line was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 8 fields, found {0}")]
    FieldCount(usize),

    #[error("quantity is not an integer: {0:?}")]
    InvalidQuantity(String),

    #[error("unit price is not a number: {0:?}")]
    InvalidPrice(String),

    #[error("date is not YYYY-MM-DD: {0:?}")]
    InvalidDate(String),

    #[error("customer id is missing")]
    MissingCustomerId,

    #[error("region is missing")]
    MissingRegion,

    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    #[error("unit price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("transaction id must start with 'T': {0:?}")]
    BadTransactionId(String),
}

/// Output of `parse_transactions`: the kept records plus the counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseReport {
    pub transactions: Vec<Transaction>,
    pub total_parsed: usize,
    pub invalid_removed: usize,
}

impl ParseReport {
    pub fn valid_kept(&self) -> usize {
        self.transactions.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Total records parsed: {} | Invalid records removed: {} | Valid records after cleaning: {}",
            self.total_parsed,
            self.invalid_removed,
            self.valid_kept()
        )
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse raw data lines (header and blank lines already removed)
///
/// Each line is counted exactly once, either as kept or as invalid.
pub fn parse_transactions<I, S>(raw_lines: I) -> ParseReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ParseReport::default();

    for (index, line) in raw_lines.into_iter().enumerate() {
        report.total_parsed += 1;

        match parse_line(line.as_ref()) {
            Ok(tx) => report.transactions.push(tx),
            Err(reason) => {
                report.invalid_removed += 1;
                tracing::debug!(line = index + 1, %reason, "rejected sales line");
            }
        }
    }

    tracing::info!(
        total = report.total_parsed,
        invalid = report.invalid_removed,
        valid = report.valid_kept(),
        "parsed sales records"
    );

    report
}

/// Parse and clean one line
pub fn parse_line(line: &str) -> Result<Transaction, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let quantity = parse_quantity(fields[4])?;
    let unit_price = parse_price(fields[5])?;

    let raw_date = fields[1].trim();
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(raw_date.to_string()))?;

    let transaction_id = fields[0].trim();
    let customer_id = fields[6].trim();
    let region = fields[7].trim();

    if customer_id.is_empty() {
        return Err(ParseError::MissingCustomerId);
    }
    if region.is_empty() {
        return Err(ParseError::MissingRegion);
    }
    if quantity <= 0 {
        return Err(ParseError::NonPositiveQuantity(quantity));
    }
    if unit_price <= 0.0 {
        return Err(ParseError::NonPositivePrice(unit_price));
    }
    if !transaction_id.starts_with('T') {
        return Err(ParseError::BadTransactionId(transaction_id.to_string()));
    }

    Ok(Transaction {
        transaction_id: transaction_id.to_string(),
        date,
        product_id: fields[2].trim().to_string(),
        product_name: fields[3].replace(',', "").trim().to_string(),
        quantity,
        unit_price,
        customer_id: customer_id.to_string(),
        region: region.to_string(),
    })
}

/// Integer quantity, thousands separators allowed ("1,200")
fn parse_quantity(raw: &str) -> Result<i64, ParseError> {
    strip_thousands(raw)
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidQuantity(raw.to_string()))
}

/// Finite decimal price, thousands separators allowed ("45,000.50")
fn parse_price(raw: &str) -> Result<f64, ParseError> {
    strip_thousands(raw)
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| ParseError::InvalidPrice(raw.to_string()))
}

fn strip_thousands(raw: &str) -> String {
    raw.trim().replace(',', "")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let tx = parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001|North").unwrap();

        assert_eq!(tx.transaction_id, "T001");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(tx.product_id, "P101");
        assert_eq!(tx.product_name, "Laptop");
        assert_eq!(tx.quantity, 2);
        assert_eq!(tx.unit_price, 45000.0);
        assert_eq!(tx.customer_id, "C001");
        assert_eq!(tx.region, "North");
    }

    #[test]
    fn test_thousands_separators_are_stripped() {
        let tx = parse_line("T002|2024-12-02|P102|Mouse,Wireless|1,200|1,500.50|C002|South").unwrap();

        assert_eq!(tx.quantity, 1200);
        assert_eq!(tx.unit_price, 1500.5);
        assert_eq!(tx.product_name, "MouseWireless");
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001"),
            Err(ParseError::FieldCount(7))
        );
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001|North|extra"),
            Err(ParseError::FieldCount(9))
        );
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        assert!(matches!(
            parse_line("T001|2024-12-01|P101|Laptop|two|45000|C001|North"),
            Err(ParseError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_line("T001|2024-12-01|P101|Laptop|2.5|45000|C001|North"),
            Err(ParseError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_line("T001|2024-12-01|P101|Laptop|2|abc|C001|North"),
            Err(ParseError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_line("T001|2024-12-01|P101|Laptop|2|inf|C001|North"),
            Err(ParseError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(matches!(
            parse_line("T001|12/01/2024|P101|Laptop|2|45000|C001|North"),
            Err(ParseError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_cleaning_criteria() {
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|2|45000|  |North"),
            Err(ParseError::MissingCustomerId)
        );
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|2|45000|C001|"),
            Err(ParseError::MissingRegion)
        );
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|0|45000|C001|North"),
            Err(ParseError::NonPositiveQuantity(0))
        );
        assert_eq!(
            parse_line("T001|2024-12-01|P101|Laptop|2|-5|C001|North"),
            Err(ParseError::NonPositivePrice(-5.0))
        );
        assert!(matches!(
            parse_line("X001|2024-12-01|P101|Laptop|2|45000|C001|North"),
            Err(ParseError::BadTransactionId(_))
        ));
    }

    #[test]
    fn test_zero_quantity_counted_invalid() {
        let report = parse_transactions([
            "T1|2024-01-01|P10|Mouse|5|200|C1|North",
            "T2|2024-01-01|P10|Mouse|0|200|C2|South",
        ]);

        assert_eq!(report.total_parsed, 2);
        assert_eq!(report.invalid_removed, 1);
        assert_eq!(report.valid_kept(), 1);
        assert_eq!(report.transactions[0].transaction_id, "T1");
    }

    #[test]
    fn test_line_with_several_faults_counted_once() {
        // non-numeric quantity AND bad id AND missing region
        let report = parse_transactions(vec!["X1|2024-01-01|P10|Mouse|abc|200|C1|".to_string()]);

        assert_eq!(report.total_parsed, 1);
        assert_eq!(report.invalid_removed, 1);
        assert_eq!(report.valid_kept(), 0);
    }

    #[test]
    fn test_counts_always_add_up() {
        let lines = [
            "T1|2024-01-01|P10|Mouse|5|200|C1|North",
            "garbage",
            "T3|2024-01-02|P11|Keyboard|1|1,250|C3|East",
            "T4|2024-01-02|P11|Keyboard|-1|1250|C3|East",
            "",
        ];
        let report = parse_transactions(lines);

        assert_eq!(report.total_parsed, 5);
        assert_eq!(report.invalid_removed + report.valid_kept(), report.total_parsed);
        assert_eq!(report.valid_kept(), 2);
        assert!(report.summary().contains("Invalid records removed: 3"));
    }
}
