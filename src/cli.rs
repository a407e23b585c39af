use crate::analytics::{DEFAULT_LOW_PERFORMER_THRESHOLD, DEFAULT_TOP_N};
use crate::config::{Config, DEFAULT_ENRICHED_OUTPUT, DEFAULT_INPUT, DEFAULT_REPORT};
use crate::enrichment::DEFAULT_CATALOG_URL;
use crate::validation::FilterCriteria;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sales-analytics", version)]
#[command(about = "Sales Analytics - clean, filter and summarize pipe-delimited sales data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Pipe-delimited sales file (header + 8 fields per row)
    #[arg(long, env = "SALES_INPUT", default_value = DEFAULT_INPUT, global = true)]
    pub input: PathBuf,

    /// Where the enriched records are written
    #[arg(long, env = "SALES_ENRICHED_OUTPUT", default_value = DEFAULT_ENRICHED_OUTPUT, global = true)]
    pub enriched_output: PathBuf,

    /// Where the text report is written
    #[arg(long, env = "SALES_REPORT", default_value = DEFAULT_REPORT, global = true)]
    pub report: PathBuf,

    /// Product catalog base URL
    #[arg(long, env = "CATALOG_URL", default_value = DEFAULT_CATALOG_URL, global = true)]
    pub catalog_url: String,

    /// Do not contact the product catalog
    #[arg(long, global = true)]
    pub offline: bool,

    /// Prompt for filter criteria
    #[arg(short, long, global = true)]
    pub interactive: bool,

    /// Keep only this region (case-insensitive)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Keep transactions worth at least this much
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub min_amount: Option<f64>,

    /// Keep transactions worth at most this much
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub max_amount: Option<f64>,

    /// Number of top products to list
    #[arg(long, default_value_t = DEFAULT_TOP_N, global = true)]
    pub top: usize,

    /// Units below which a product counts as a low performer
    #[arg(long, default_value_t = DEFAULT_LOW_PERFORMER_THRESHOLD, global = true)]
    pub low_threshold: i64,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Read, clean, analyze, enrich and report (default)
    Run,

    /// Print the analysis as JSON; no enrichment, nothing written
    Analyze {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    pub fn to_config(&self) -> Config {
        Config {
            input_path: self.input.clone(),
            enriched_path: self.enriched_output.clone(),
            report_path: self.report.clone(),
            catalog_url: self.catalog_url.clone(),
            offline: self.offline,
            interactive: self.interactive,
            filter: FilterCriteria {
                region: self.region.clone(),
                min_amount: self.min_amount,
                max_amount: self.max_amount,
            },
            top_n: self.top,
            low_performer_threshold: self.low_threshold,
        }
    }
}
