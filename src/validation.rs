// ✅ Validator/Filter Engine - structural re-check + optional narrowing
//
// Two phases:
//   1. validation: every record re-checked, independent of the parser
//   2. filtering:  survivors narrowed by region and amount range
//
// Each input record lands in exactly one bucket:
//   kept | invalid | filtered_by_region | filtered_by_amount

use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

// ============================================================================
// CRITERIA
// ============================================================================

/// User-supplied narrowing; absent fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_min_amount(mut self, min_amount: f64) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    /// True when no filter would be applied
    pub fn is_empty(&self) -> bool {
        self.region_filter().is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }

    /// Region to match, ignoring blank input
    fn region_filter(&self) -> Option<&str> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }

    fn region_matches(&self, tx: &Transaction) -> bool {
        match self.region_filter() {
            Some(wanted) => tx.region.trim().to_lowercase() == wanted.to_lowercase(),
            None => true,
        }
    }

    /// Inclusive bounds: only strictly-below-min or strictly-above-max fail
    fn amount_matches(&self, amount: f64) -> bool {
        let above_min = self.min_amount.map_or(true, |min| amount >= min);
        let below_max = self.max_amount.map_or(true, |max| amount <= max);
        above_min && below_max
    }
}

// ============================================================================
// RECORD CHECKS
// ============================================================================

/// First structural rule a record breaks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error("quantity must be positive")]
    NonPositiveQuantity,

    #[error("unit price must be positive")]
    NonPositivePrice,

    #[error("transaction id must start with 'T'")]
    TransactionIdPrefix,

    #[error("product id must start with 'P'")]
    ProductIdPrefix,

    #[error("customer id must start with 'C'")]
    CustomerIdPrefix,

    #[error("region is blank")]
    BlankRegion,
}

/// Re-check the structural invariants of one record
pub fn check_record(tx: &Transaction) -> Result<(), ValidationFailure> {
    if tx.quantity <= 0 {
        return Err(ValidationFailure::NonPositiveQuantity);
    }
    // NaN fails this comparison too
    if !(tx.unit_price > 0.0) {
        return Err(ValidationFailure::NonPositivePrice);
    }
    if !tx.transaction_id.starts_with('T') {
        return Err(ValidationFailure::TransactionIdPrefix);
    }
    if !tx.product_id.starts_with('P') {
        return Err(ValidationFailure::ProductIdPrefix);
    }
    if !tx.customer_id.starts_with('C') {
        return Err(ValidationFailure::CustomerIdPrefix);
    }
    if tx.region.trim().is_empty() {
        return Err(ValidationFailure::BlankRegion);
    }
    Ok(())
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Per-bucket counts of one `validate_and_filter` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

impl FilterSummary {
    /// Records removed for any reason
    pub fn excluded(&self) -> usize {
        self.invalid + self.filtered_by_region + self.filtered_by_amount
    }

    /// Buckets are exhaustive and disjoint
    pub fn is_consistent(&self) -> bool {
        self.excluded() + self.final_count == self.total_input
    }

    pub fn summary(&self) -> String {
        format!(
            "{} input: {} invalid, {} filtered by region, {} filtered by amount, {} kept",
            self.total_input,
            self.invalid,
            self.filtered_by_region,
            self.filtered_by_amount,
            self.final_count
        )
    }
}

/// Hints for choosing filter values; never affects the kept set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Sorted distinct regions among validation survivors
    pub regions: Vec<String>,
    /// Smallest and largest survivor amount, if any survived
    pub amount_range: Option<(f64, f64)>,
}

impl FilterOptions {
    fn from_survivors(survivors: &[&Transaction]) -> Self {
        let regions: BTreeSet<&str> = survivors.iter().map(|tx| tx.region.as_str()).collect();

        let amount_range = survivors.iter().map(|tx| tx.amount()).fold(None, |range, amount| {
            match range {
                None => Some((amount, amount)),
                Some((lo, hi)) => Some((f64::min(lo, amount), f64::max(hi, amount))),
            }
        });

        FilterOptions {
            regions: regions.into_iter().map(str::to_owned).collect(),
            amount_range,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOutcome {
    pub kept: Vec<Transaction>,
    pub invalid_count: usize,
    pub summary: FilterSummary,
    pub options: FilterOptions,
}

// ============================================================================
// VALIDATE + FILTER
// ============================================================================

/// Validate every record, then apply `criteria` to the survivors
///
/// With empty criteria this is a dry run: `kept` is the full validated
/// set and `options` describes it.
pub fn validate_and_filter(records: &[Transaction], criteria: &FilterCriteria) -> FilterOutcome {
    let mut summary = FilterSummary {
        total_input: records.len(),
        ..FilterSummary::default()
    };

    // Phase 1: validation
    let mut survivors = Vec::with_capacity(records.len());
    for tx in records {
        match check_record(tx) {
            Ok(()) => survivors.push(tx),
            Err(failure) => {
                summary.invalid += 1;
                tracing::debug!(transaction_id = %tx.transaction_id, %failure, "record failed validation");
            }
        }
    }

    let options = FilterOptions::from_survivors(&survivors);

    // Phase 2: filtering
    let mut kept = Vec::with_capacity(survivors.len());
    for tx in survivors {
        if !criteria.region_matches(tx) {
            summary.filtered_by_region += 1;
            continue;
        }
        if !criteria.amount_matches(tx.amount()) {
            summary.filtered_by_amount += 1;
            continue;
        }
        kept.push(tx.clone());
    }
    summary.final_count = kept.len();

    tracing::info!(
        total = summary.total_input,
        invalid = summary.invalid,
        by_region = summary.filtered_by_region,
        by_amount = summary.filtered_by_amount,
        kept = summary.final_count,
        "validated and filtered records"
    );

    FilterOutcome {
        kept,
        invalid_count: summary.invalid,
        summary,
        options,
    }
}

// ============================================================================
// TESTS
// ============================================================================
