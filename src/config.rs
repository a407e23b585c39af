use crate::analytics::{DEFAULT_LOW_PERFORMER_THRESHOLD, DEFAULT_TOP_N};
use crate::enrichment::DEFAULT_CATALOG_URL;
use crate::validation::FilterCriteria;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "data/sales_data.txt";
pub const DEFAULT_ENRICHED_OUTPUT: &str = "data/enriched_sales_data.txt";
pub const DEFAULT_REPORT: &str = "output/sales_report.txt";

/// Everything one pipeline run needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub enriched_path: PathBuf,
    pub report_path: PathBuf,
    pub catalog_url: String,
    /// Skip the catalog entirely
    pub offline: bool,
    /// Ask for filter criteria on the terminal
    pub interactive: bool,
    /// Criteria applied when not interactive
    pub filter: FilterCriteria,
    pub top_n: usize,
    pub low_performer_threshold: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_path: PathBuf::from(DEFAULT_INPUT),
            enriched_path: PathBuf::from(DEFAULT_ENRICHED_OUTPUT),
            report_path: PathBuf::from(DEFAULT_REPORT),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            offline: false,
            interactive: false,
            filter: FilterCriteria::default(),
            top_n: DEFAULT_TOP_N,
            low_performer_threshold: DEFAULT_LOW_PERFORMER_THRESHOLD,
        }
    }
}

/// Load `.env` if present so clap's `env` fallbacks can see it
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
}
