// 📊 Aggregation Engine - pure reducers over a validated record set
//
// Every reducer builds its own local accumulator, returns an owned ordered
// Vec and never touches its input. Revenue is always quantity × unit_price
// per record, so all aggregates agree on the same revenue base.

use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number of products returned by `top_selling_products` by default
pub const DEFAULT_TOP_N: usize = 5;

/// Products selling fewer units than this are low performers by default
pub const DEFAULT_LOW_PERFORMER_THRESHOLD: i64 = 10;

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStats {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    /// Share of the grand total, 2 decimals
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductStats {
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    /// Distinct product names, sorted
    pub products_bought: Vec<String>,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub revenue: f64,
    pub transaction_count: usize,
}

// ============================================================================
// REDUCERS
// ============================================================================

/// Σ quantity × unit_price; 0 for an empty set
pub fn calculate_total_revenue(records: &[Transaction]) -> f64 {
    records.iter().map(Transaction::amount).sum()
}

/// Revenue and count per region, descending by revenue
pub fn region_wise_sales(records: &[Transaction]) -> Vec<RegionStats> {
    let grand_total = calculate_total_revenue(records);

    let mut by_region: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for tx in records {
        let entry = by_region.entry(tx.region.as_str()).or_insert((0.0, 0));
        entry.0 += tx.amount();
        entry.1 += 1;
    }

    let mut stats: Vec<RegionStats> = by_region
        .into_iter()
        .map(|(region, (total_sales, transaction_count))| RegionStats {
            region: region.to_string(),
            total_sales,
            transaction_count,
            percentage: if grand_total > 0.0 {
                round2(total_sales / grand_total * 100.0)
            } else {
                0.0
            },
        })
        .collect();

    // stable: equal revenue keeps region-name order
    stats.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    stats
}

/// Top `n` products by units sold, descending
///
/// `n` larger than the number of distinct products returns all of them.
pub fn top_selling_products(records: &[Transaction], n: usize) -> Vec<ProductStats> {
    let mut products = product_totals(records);
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products.truncate(n);
    products
}

/// Spend, count, distinct products and average order value per customer,
/// descending by spend
pub fn customer_analysis(records: &[Transaction]) -> Vec<CustomerStats> {
    struct Acc<'a> {
        total_spent: f64,
        purchase_count: usize,
        products: BTreeSet<&'a str>,
    }

    let mut by_customer: BTreeMap<&str, Acc<'_>> = BTreeMap::new();
    for tx in records {
        let acc = by_customer.entry(tx.customer_id.as_str()).or_insert_with(|| Acc {
            total_spent: 0.0,
            purchase_count: 0,
            products: BTreeSet::new(),
        });
        acc.total_spent += tx.amount();
        acc.purchase_count += 1;
        acc.products.insert(tx.product_name.as_str());
    }

    let mut stats: Vec<CustomerStats> = by_customer
        .into_iter()
        .map(|(customer_id, acc)| CustomerStats {
            customer_id: customer_id.to_string(),
            total_spent: acc.total_spent,
            purchase_count: acc.purchase_count,
            products_bought: acc.products.into_iter().map(str::to_owned).collect(),
            avg_order_value: if acc.purchase_count > 0 {
                round2(acc.total_spent / acc.purchase_count as f64)
            } else {
                0.0
            },
        })
        .collect();

    stats.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    stats
}

/// Revenue, count and distinct customers per day, ascending by date
pub fn daily_sales_trend(records: &[Transaction]) -> Vec<DailyStats> {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize, BTreeSet<&str>)> = BTreeMap::new();
    for tx in records {
        let entry = by_date
            .entry(tx.date)
            .or_insert_with(|| (0.0, 0, BTreeSet::new()));
        entry.0 += tx.amount();
        entry.1 += 1;
        entry.2.insert(tx.customer_id.as_str());
    }

    // BTreeMap iteration is already calendar order
    by_date
        .into_iter()
        .map(|(date, (revenue, transaction_count, customers))| DailyStats {
            date,
            revenue,
            transaction_count,
            unique_customers: customers.len(),
        })
        .collect()
}

/// Day with the highest revenue; `None` when there is no data
///
/// Ties go to the earliest date.
pub fn find_peak_sales_day(records: &[Transaction]) -> Option<PeakDay> {
    let mut peak: Option<PeakDay> = None;

    for day in daily_sales_trend(records) {
        let is_higher = peak.as_ref().map_or(true, |best| day.revenue > best.revenue);
        if is_higher {
            peak = Some(PeakDay {
                date: day.date,
                revenue: day.revenue,
                transaction_count: day.transaction_count,
            });
        }
    }

    peak
}

/// Products whose total units sold are strictly below `threshold`,
/// ascending by units
pub fn low_performing_products(records: &[Transaction], threshold: i64) -> Vec<ProductStats> {
    let mut products: Vec<ProductStats> = product_totals(records)
        .into_iter()
        .filter(|p| p.total_quantity < threshold)
        .collect();
    products.sort_by_key(|p| p.total_quantity);
    products
}

/// Units and revenue per product name, in name order
fn product_totals(records: &[Transaction]) -> Vec<ProductStats> {
    let mut by_product: BTreeMap<&str, (i64, f64)> = BTreeMap::new();
    for tx in records {
        let entry = by_product.entry(tx.product_name.as_str()).or_insert((0, 0.0));
        // Units saturate at i64::MAX instead of wrapping
        entry.0 = entry.0.saturating_add(tx.quantity);
        entry.1 += tx.amount();
    }

    by_product
        .into_iter()
        .map(|(name, (total_quantity, total_revenue))| ProductStats {
            product_name: name.to_string(),
            total_quantity,
            total_revenue,
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// ANALYTICS ENGINE
// ============================================================================

/// Every aggregate of one record set, computed in one go
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAnalysis {
    pub record_count: usize,
    pub total_revenue: f64,
    pub average_transaction_value: f64,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub regions: Vec<RegionStats>,
    pub top_products: Vec<ProductStats>,
    pub customers: Vec<CustomerStats>,
    pub daily_trend: Vec<DailyStats>,
    pub peak_day: Option<PeakDay>,
    pub low_performers: Vec<ProductStats>,
}

impl SalesAnalysis {
    pub fn summary(&self) -> String {
        let top = self
            .top_products
            .first()
            .map(|p| p.product_name.as_str())
            .unwrap_or("-");
        format!(
            "{} transactions, revenue {:.2}, {} regions, top product {}, {} low performers",
            self.record_count,
            self.total_revenue,
            self.regions.len(),
            top,
            self.low_performers.len()
        )
    }
}

pub struct AnalyticsEngine {
    /// How many products `top_products` keeps (default: 5)
    pub top_n: usize,

    /// Units below which a product is a low performer (default: 10)
    pub low_performer_threshold: i64,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        AnalyticsEngine {
            top_n: DEFAULT_TOP_N,
            low_performer_threshold: DEFAULT_LOW_PERFORMER_THRESHOLD,
        }
    }

    pub fn with_limits(top_n: usize, low_performer_threshold: i64) -> Self {
        AnalyticsEngine {
            top_n,
            low_performer_threshold,
        }
    }

    pub fn analyze(&self, records: &[Transaction]) -> SalesAnalysis {
        let total_revenue = calculate_total_revenue(records);
        let average_transaction_value = if records.is_empty() {
            0.0
        } else {
            round2(total_revenue / records.len() as f64)
        };

        let daily_trend = daily_sales_trend(records);
        let date_range = match (daily_trend.first(), daily_trend.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        };

        let analysis = SalesAnalysis {
            record_count: records.len(),
            total_revenue,
            average_transaction_value,
            date_range,
            regions: region_wise_sales(records),
            top_products: top_selling_products(records, self.top_n),
            customers: customer_analysis(records),
            peak_day: find_peak_sales_day(records),
            low_performers: low_performing_products(records, self.low_performer_threshold),
            daily_trend,
        };

        tracing::info!(summary = %analysis.summary(), "analysis complete");
        analysis
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
