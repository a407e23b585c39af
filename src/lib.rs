// Sales Analytics - Core Library
// parse → validate/filter → aggregate, plus the enrichment and report collaborators

pub mod transaction;
pub mod reader;
pub mod parser;
pub mod validation;
pub mod analytics;
pub mod enrichment;
pub mod report;
pub mod prompt;
pub mod output;
pub mod config;
pub mod cli;
pub mod pipeline;

// Re-export commonly used types
pub use transaction::{Transaction, SALES_HEADER};
pub use reader::{read_sales_data, DecodedLines, Encoding, UnreadableFile};
pub use parser::{parse_line, parse_transactions, ParseError, ParseReport};
pub use validation::{
    check_record, validate_and_filter, FilterCriteria, FilterOptions, FilterOutcome,
    FilterSummary, ValidationFailure,
};
pub use analytics::{
    calculate_total_revenue, customer_analysis, daily_sales_trend, find_peak_sales_day,
    low_performing_products, region_wise_sales, top_selling_products, AnalyticsEngine,
    CustomerStats, DailyStats, PeakDay, ProductStats, RegionStats, SalesAnalysis,
};
pub use enrichment::{
    catalog_id, create_product_mapping, enrich_sales_data, fetch_or_empty, save_enriched_data,
    CatalogError, CatalogProduct, EnrichedTransaction, EnrichmentStats, OfflineCatalog,
    ProductCatalog, ProductMapping,
};
#[cfg(feature = "catalog")]
pub use enrichment::HttpCatalog;
pub use report::{generate_sales_report, render_report};
pub use config::Config;
pub use pipeline::{analyze_file, catalog_for, run, PipelineOutcome, RunSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
