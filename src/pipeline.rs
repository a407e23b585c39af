// 🚚 Pipeline - read → parse → validate/filter → analyze → enrich → report
//
// Empty input and an empty validated set stop the run gracefully; every
// other failure bubbles up as an error for the caller to report.

use crate::analytics::{AnalyticsEngine, SalesAnalysis};
use crate::config::Config;
use crate::enrichment::{
    create_product_mapping, enrich_sales_data, fetch_or_empty, save_enriched_data, EnrichmentStats,
    OfflineCatalog, ProductCatalog,
};
use crate::parser::{parse_transactions, ParseReport};
use crate::prompt::prompt_filter_criteria;
use crate::reader::{read_sales_data, DecodedLines, UnreadableFile};
use crate::report::generate_sales_report;
use crate::validation::{validate_and_filter, FilterCriteria, FilterSummary};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const STEPS: usize = 10;

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total_parsed: usize,
    pub invalid_removed: usize,
    pub filter: FilterSummary,
    pub analysis: SalesAnalysis,
    pub enrichment: EnrichmentStats,
    pub enriched_path: PathBuf,
    pub report_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub enum PipelineOutcome {
    Completed(Box<RunSummary>),
    /// File missing or holding no data rows
    NoInput,
    /// Nothing survived cleaning, validation and filtering
    NoValidRecords,
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }
}

// ============================================================================
// CATALOG SELECTION
// ============================================================================

/// HTTP catalog unless offline (or built without the `catalog` feature)
pub fn catalog_for(config: &Config) -> Box<dyn ProductCatalog> {
    if config.offline {
        return Box::new(OfflineCatalog);
    }

    #[cfg(feature = "catalog")]
    {
        match crate::enrichment::HttpCatalog::new(config.catalog_url.clone()) {
            Ok(catalog) => return Box::new(catalog),
            Err(e) => tracing::warn!(error = %e, "could not build catalog client, running offline"),
        }
    }

    Box::new(OfflineCatalog)
}

// ============================================================================
// STAGES
// ============================================================================

/// Read the configured file; a missing file is "no input", not an error
fn load_lines(config: &Config) -> Result<Option<DecodedLines>> {
    match read_sales_data(&config.input_path) {
        Ok(decoded) if decoded.is_empty() => Ok(None),
        Ok(decoded) => Ok(Some(decoded)),
        Err(UnreadableFile::NotFound(path)) => {
            tracing::warn!(path = %path.display(), "sales file not found");
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to read sales data"),
    }
}

/// Read, parse and filter with the configured criteria, then analyze.
/// `None` when there is nothing to analyze.
pub fn analyze_file(config: &Config) -> Result<Option<SalesAnalysis>> {
    let Some(decoded) = load_lines(config)? else {
        return Ok(None);
    };

    let parsed = parse_transactions(&decoded.lines);
    let kept = validate_and_filter(&parsed.transactions, &config.filter).kept;
    if kept.is_empty() {
        return Ok(None);
    }

    let engine = AnalyticsEngine::with_limits(config.top_n, config.low_performer_threshold);
    Ok(Some(engine.analyze(&kept)))
}

// ============================================================================
// FULL RUN
// ============================================================================

/// Run all ten steps, writing progress lines to `out`
///
/// `input` is only read when `config.interactive` is set.
pub fn run<R: BufRead, W: Write>(
    config: &Config,
    catalog: &dyn ProductCatalog,
    input: &mut R,
    out: &mut W,
) -> Result<PipelineOutcome> {
    // 1. Read
    step(out, 1, "Reading sales data...")?;
    let Some(decoded) = load_lines(config)? else {
        writeln!(out, "Error: No data found or file is empty.")?;
        return Ok(PipelineOutcome::NoInput);
    };
    writeln!(out, "✓ Successfully read {} lines ({})\n", decoded.len(), decoded.encoding.name())?;

    // 2. Parse + clean
    step(out, 2, "Parsing and cleaning data...")?;
    let ParseReport {
        transactions: parsed,
        total_parsed,
        invalid_removed,
    } = parse_transactions(&decoded.lines);
    writeln!(out, "Total records parsed: {}", total_parsed)?;
    writeln!(out, "Invalid records removed: {}", invalid_removed)?;
    writeln!(out, "✓ Parsed {} valid records\n", parsed.len())?;

    // 3. Filter options (dry run) + criteria
    step(out, 3, "Filter Options Available:")?;
    let dry_run = validate_and_filter(&parsed, &FilterCriteria::default());
    let criteria = if config.interactive {
        prompt_filter_criteria(input, out, &dry_run.options)
            .context("Failed to read filter criteria")?
            .unwrap_or_default()
    } else {
        writeln!(out, "Available Regions: {}", dry_run.options.regions.join(", "))?;
        if let Some((min, max)) = dry_run.options.amount_range {
            writeln!(out, "Transaction Amount Range: {:.2} - {:.2}", min, max)?;
        }
        config.filter.clone()
    };

    let filtered_outcome = validate_and_filter(&parsed, &criteria);
    let filter_summary = filtered_outcome.summary;
    let filtered = filtered_outcome.kept;
    if criteria.is_empty() {
        writeln!(out, "✓ Proceeding with full dataset.\n")?;
    } else {
        writeln!(out, "✓ Filter applied. {} records remain.\n", filtered.len())?;
    }

    // 4. Validate the final set
    step(out, 4, "Validating transactions...")?;
    let validated = validate_and_filter(&filtered, &FilterCriteria::default());
    writeln!(
        out,
        "✓ Valid: {} | Invalid/Filtered Out: {}\n",
        validated.summary.final_count,
        filter_summary.excluded() + validated.summary.excluded()
    )?;
    if validated.kept.is_empty() {
        writeln!(out, "Error: No valid transactions available to process.")?;
        return Ok(PipelineOutcome::NoValidRecords);
    }
    let records = validated.kept;

    // 5. Analyze
    step(out, 5, "Analyzing sales data...")?;
    let engine = AnalyticsEngine::with_limits(config.top_n, config.low_performer_threshold);
    let analysis = engine.analyze(&records);
    writeln!(out, "✓ Analysis complete\n")?;

    // 6. Catalog
    step(out, 6, "Fetching product data from API...")?;
    let products = fetch_or_empty(catalog);
    if products.is_empty() {
        writeln!(out, "Warning: API fetch failed. Enrichment will be skipped (API fields will be empty).\n")?;
    } else {
        writeln!(out, "✓ Fetched {} products\n", products.len())?;
    }

    // 7. Enrich
    step(out, 7, "Enriching sales data...")?;
    let mapping = create_product_mapping(&products);
    let enriched = enrich_sales_data(&records, &mapping);
    let enrichment = EnrichmentStats::from_enriched(&enriched);
    writeln!(out, "✓ {}\n", enrichment.summary())?;

    // 8. Save enriched
    step(out, 8, "Saving enriched data...")?;
    save_enriched_data(&config.enriched_path, &enriched)?;
    writeln!(out, "✓ Saved to: {}\n", config.enriched_path.display())?;

    // 9. Report
    step(out, 9, "Generating report...")?;
    generate_sales_report(&config.report_path, &analysis, &enriched)?;
    writeln!(out, "✓ Report saved to: {}\n", config.report_path.display())?;

    // 10. Done
    step(out, 10, "Process Complete!")?;

    Ok(PipelineOutcome::Completed(Box::new(RunSummary {
        total_parsed,
        invalid_removed,
        filter: filter_summary,
        analysis,
        enrichment,
        enriched_path: config.enriched_path.clone(),
        report_path: config.report_path.clone(),
    })))
}

fn step<W: Write>(out: &mut W, n: usize, message: &str) -> Result<()> {
    writeln!(out, "[{}/{}] {}", n, STEPS, message)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
