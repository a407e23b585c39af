use sales_analytics::{
    analyze_file, calculate_total_revenue, find_peak_sales_day, low_performing_products,
    parse_transactions, region_wise_sales, run, top_selling_products, validate_and_filter, Config,
    FilterCriteria, OfflineCatalog, PipelineOutcome,
};
use std::fs;
use std::io::Cursor;

const SALES: &str = "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-12-01|P101|Laptop|2|45,000|C001|North
T002|2024-12-01|P102|Mouse|10|500|C002|South
T003|2024-12-02|P103|Keyboard|4|1,500|C001|East
T004|2024-12-02|P102|Mouse|0|500|C003|North
T005|2024-12-03|P104|Monitor|3|12000|C004|West
T006|2024-12-03|P105|Webcam,HD|1|3000||North
X007|2024-12-03|P106|Headphones|5|2000|C005|South
T008|2024-12-04|P102|Mouse|6|500|C003|north
T009|2024-12-04|P107|USB Cable|25|150|C002|East
T010|2024-12-05|P101|Laptop|1|45000|C005
T011|2024-12-05|P103|Keyboard|2|1500|C006|West

";

fn write_sales(dir: &std::path::Path) -> Config {
    let config = Config {
        input_path: dir.join("sales_data.txt"),
        enriched_path: dir.join("data/enriched_sales_data.txt"),
        report_path: dir.join("output/sales_report.txt"),
        offline: true,
        ..Config::default()
    };
    fs::write(&config.input_path, SALES).unwrap();
    config
}

fn data_lines() -> Vec<&'static str> {
    SALES.lines().skip(1).filter(|l| !l.trim().is_empty()).collect()
}

#[test]
fn test_parser_counts() {
    let report = parse_transactions(data_lines());

    // T004 qty 0, T006 no customer, X007 bad id, T010 seven fields
    assert_eq!(report.total_parsed, 11);
    assert_eq!(report.invalid_removed, 4);
    assert_eq!(report.valid_kept(), 7);
}

#[test]
fn test_summary_buckets_sum_to_total() {
    let records = parse_transactions(data_lines()).transactions;

    for criteria in [
        FilterCriteria::new(),
        FilterCriteria::new().with_region("NORTH"),
        FilterCriteria::new().with_min_amount(3000.0),
        FilterCriteria::new().with_region("east").with_max_amount(4000.0),
        FilterCriteria::new().with_min_amount(1e9),
    ] {
        let outcome = validate_and_filter(&records, &criteria);
        let s = &outcome.summary;
        assert_eq!(s.invalid + s.filtered_by_region + s.filtered_by_amount + s.final_count, s.total_input);
        assert_eq!(outcome.kept.len(), s.final_count);
    }
}

#[test]
fn test_region_filter_matches_case_insensitively() {
    let records = parse_transactions(data_lines()).transactions;
    let outcome = validate_and_filter(&records, &FilterCriteria::new().with_region("north"));

    // "North" and "north" are both kept
    let ids: Vec<&str> = outcome.kept.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["T001", "T008"]);
}

#[test]
fn test_aggregates_are_mutually_consistent() {
    let records = parse_transactions(data_lines()).transactions;
    let total = calculate_total_revenue(&records);
    let regions = region_wise_sales(&records);

    let sum: f64 = regions.iter().map(|r| r.total_sales).sum();
    let pct: f64 = regions.iter().map(|r| r.percentage).sum();
    assert!((sum - total).abs() < 1e-6);
    assert!((pct - 100.0).abs() < 0.05);

    let top = top_selling_products(&records, 100);
    assert!(top.windows(2).all(|w| w[0].total_quantity >= w[1].total_quantity));
    assert_eq!(top.iter().map(|p| p.total_revenue).sum::<f64>(), total);

    let low = low_performing_products(&records, 10);
    assert!(low.iter().all(|p| p.total_quantity < 10));
    assert!(low.windows(2).all(|w| w[0].total_quantity <= w[1].total_quantity));

    let peak = find_peak_sales_day(&records).unwrap();
    assert_eq!(peak.date.to_string(), "2024-12-01");
    assert_eq!(peak.revenue, 95000.0);
}

#[test]
fn test_full_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_sales(dir.path());
    config.filter = FilterCriteria::new().with_min_amount(1000.0);

    let mut outcomes = Vec::new();
    for _ in 0..2 {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let outcome = run(&config, &OfflineCatalog, &mut input, &mut out).unwrap();
        let PipelineOutcome::Completed(summary) = outcome else {
            panic!("expected completed run");
        };
        outcomes.push((
            serde_json::to_string(&summary.analysis).unwrap(),
            fs::read_to_string(&config.enriched_path).unwrap(),
        ));
    }

    assert_eq!(outcomes[0], outcomes[1]);
}

#[test]
fn test_enriched_file_without_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_sales(dir.path());

    let mut input = Cursor::new(Vec::new());
    let mut out = Vec::new();
    let outcome = run(&config, &OfflineCatalog, &mut input, &mut out).unwrap();
    assert!(outcome.is_completed());

    let enriched = fs::read_to_string(&config.enriched_path).unwrap();
    let rows: Vec<&str> = enriched.lines().collect();
    assert_eq!(rows.len(), 8);
    assert!(rows[0].ends_with("|API_Category|API_Brand|API_Rating|API_Match"));
    assert_eq!(rows[1], "T001|2024-12-01|P101|Laptop|2|45000.0|C001|North||||False");

    let progress = String::from_utf8(out).unwrap();
    assert!(progress.contains("Warning: API fetch failed"));
    assert!(progress.contains("Enriched 0/7 transactions (0.0%)"));
}

#[test]
fn test_analyze_file_respects_filters() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_sales(dir.path());
    config.filter = FilterCriteria::new().with_region("West");

    let analysis = analyze_file(&config).unwrap().unwrap();

    assert_eq!(analysis.record_count, 2);
    assert_eq!(analysis.total_revenue, 36000.0 + 3000.0);
    assert_eq!(analysis.regions.len(), 1);
    assert_eq!(analysis.regions[0].percentage, 100.0);
}

#[test]
fn test_oversized_quantities_do_not_overflow_totals() {
    let report = parse_transactions([
        "T1|2024-12-01|P101|Crate|9000000000000000000|1|C001|North",
        "T2|2024-12-02|P101|Crate|9000000000000000000|1|C002|North",
    ]);
    assert_eq!(report.valid_kept(), 2);

    let top = top_selling_products(&report.transactions, 5);
    assert_eq!(top[0].total_quantity, i64::MAX);
    assert!(low_performing_products(&report.transactions, 10).is_empty());
}
