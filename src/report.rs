// 📝 Sales Report - human-readable text rendering of one analysis

use crate::analytics::SalesAnalysis;
use crate::enrichment::{EnrichedTransaction, EnrichmentStats};
use crate::output::write_atomic;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::path::Path;

const WIDTH: usize = 60;

/// Render and write the report, replacing any previous one
pub fn generate_sales_report(path: &Path, analysis: &SalesAnalysis, enriched: &[EnrichedTransaction]) -> Result<()> {
    let report = render_report(analysis, enriched, Local::now().naive_local());
    write_atomic(path, report.as_bytes())?;

    tracing::info!(path = %path.display(), "sales report written");
    Ok(())
}

/// Full report text; `generated_at` is the only input not derived from data
pub fn render_report(analysis: &SalesAnalysis, enriched: &[EnrichedTransaction], generated_at: NaiveDateTime) -> String {
    let enrichment = EnrichmentStats::from_enriched(enriched);
    let mut lines = Vec::new();
    let rule = "=".repeat(WIDTH);
    let thin = "-".repeat(WIDTH);

    lines.push(rule.clone());
    lines.push(center("SALES ANALYTICS REPORT"));
    lines.push(center(&format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"))));
    lines.push(center(&format!("Records Processed: {}", analysis.record_count)));
    lines.push(rule.clone());

    // Overall summary
    section(&mut lines, "OVERALL SUMMARY", &thin);
    lines.push(format!("Total Revenue:        {}", money(analysis.total_revenue)));
    lines.push(format!("Total Transactions:   {}", analysis.record_count));
    lines.push(format!("Average Order Value:  {}", money(analysis.average_transaction_value)));
    match analysis.date_range {
        Some((first, last)) => lines.push(format!("Date Range:           {} to {}", first, last)),
        None => lines.push("Date Range:           n/a".to_string()),
    }

    section(&mut lines, "REGION-WISE PERFORMANCE", &thin);
    lines.push(format!("{:<12}{:>18}{:>12}{:>14}", "Region", "Sales", "% of Total", "Transactions"));
    for r in &analysis.regions {
        lines.push(format!(
            "{:<12}{:>18}{:>11.2}%{:>14}",
            r.region,
            money(r.total_sales),
            r.percentage,
            r.transaction_count
        ));
    }

    section(&mut lines, "TOP SELLING PRODUCTS", &thin);
    lines.push(format!("{:<6}{:<24}{:>10}{:>18}", "Rank", "Product", "Quantity", "Revenue"));
    for (rank, p) in analysis.top_products.iter().enumerate() {
        lines.push(format!(
            "{:<6}{:<24}{:>10}{:>18}",
            rank + 1,
            p.product_name,
            p.total_quantity,
            money(p.total_revenue)
        ));
    }

    section(&mut lines, "TOP CUSTOMERS", &thin);
    lines.push(format!("{:<6}{:<12}{:>18}{:>10}{:>14}", "Rank", "Customer", "Total Spent", "Orders", "Avg Order"));
    for (rank, c) in analysis.customers.iter().take(5).enumerate() {
        lines.push(format!(
            "{:<6}{:<12}{:>18}{:>10}{:>14}",
            rank + 1,
            c.customer_id,
            money(c.total_spent),
            c.purchase_count,
            money(c.avg_order_value)
        ));
    }

    section(&mut lines, "DAILY SALES TREND", &thin);
    lines.push(format!("{:<12}{:>18}{:>14}{:>16}", "Date", "Revenue", "Transactions", "Customers"));
    for d in &analysis.daily_trend {
        lines.push(format!(
            "{:<12}{:>18}{:>14}{:>16}",
            d.date.to_string(),
            money(d.revenue),
            d.transaction_count,
            d.unique_customers
        ));
    }

    section(&mut lines, "PRODUCT PERFORMANCE", &thin);
    match &analysis.peak_day {
        Some(peak) => lines.push(format!(
            "Best Selling Day: {} | Revenue: {} | Transactions: {}",
            peak.date,
            money(peak.revenue),
            peak.transaction_count
        )),
        None => lines.push("Best Selling Day: no data".to_string()),
    }
    if analysis.low_performers.is_empty() {
        lines.push("Low Performing Products: none".to_string());
    } else {
        lines.push("Low Performing Products:".to_string());
        for p in &analysis.low_performers {
            lines.push(format!(
                "  - {} ({} units, {})",
                p.product_name,
                p.total_quantity,
                money(p.total_revenue)
            ));
        }
    }

    section(&mut lines, "API ENRICHMENT SUMMARY", &thin);
    lines.push(format!("Total Products Enriched: {}/{}", enrichment.matched, enrichment.total));
    lines.push(format!("Success Rate: {:.2}%", enrichment.match_rate()));
    if enrichment.unmatched_products.is_empty() {
        lines.push("Products Not Matched: none".to_string());
    } else {
        lines.push(format!("Products Not Matched: {}", enrichment.unmatched_products.join(", ")));
    }

    lines.push(String::new());
    lines.push(rule);

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

fn section(lines: &mut Vec<String>, title: &str, thin: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push(thin.to_string());
}

fn center(text: &str) -> String {
    format!("{:^width$}", text, width = WIDTH).trim_end().to_string()
}

/// Thousands separators, 2 decimals, no currency symbol
fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

// ============================================================================
// TESTS
// ============================================================================
