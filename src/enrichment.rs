// 🔗 Catalog Enrichment - attach product metadata from a remote catalog
//
// The catalog is best-effort: any failure degrades to "no enrichment" and
// the pipeline carries on with empty API fields.

use crate::output::write_atomic;
use crate::transaction::{format_decimal, Transaction, SALES_HEADER};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Default public catalog
pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";

/// Page size requested from the catalog
pub const CATALOG_PAGE_LIMIT: usize = 100;

/// Extra columns appended to the sales header in the enriched file
pub const ENRICHMENT_COLUMNS: [&str; 4] = ["API_Category", "API_Brand", "API_Rating", "API_Match"];

// ============================================================================
// CATALOG
// ============================================================================

/// One product as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<CatalogProduct>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[cfg(feature = "catalog")]
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of product metadata
pub trait ProductCatalog {
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, CatalogError>;
}

/// Fetch products, logging and swallowing any failure
pub fn fetch_or_empty(catalog: &dyn ProductCatalog) -> Vec<CatalogProduct> {
    match catalog.fetch_products() {
        Ok(products) => {
            tracing::info!(count = products.len(), "fetched catalog products");
            products
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog fetch failed, enrichment will be skipped");
            Vec::new()
        }
    }
}

/// Catalog that never has anything (offline runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineCatalog;

impl ProductCatalog for OfflineCatalog {
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        Ok(Vec::new())
    }
}

/// DummyJSON-style HTTP catalog: `GET {base_url}/products?limit=N`
#[cfg(feature = "catalog")]
pub struct HttpCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
    limit: usize,
}

#[cfg(feature = "catalog")]
impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(HttpCatalog {
            client,
            base_url: base_url.into(),
            limit: CATALOG_PAGE_LIMIT,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(feature = "catalog")]
impl ProductCatalog for HttpCatalog {
    fn fetch_products(&self) -> Result<Vec<CatalogProduct>, CatalogError> {
        let url = format!("{}/products", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, limit = self.limit, "requesting catalog");

        let page: ProductPage = self
            .client
            .get(&url)
            .query(&[("limit", self.limit)])
            .send()?
            .error_for_status()?
            .json()?;

        Ok(page.products)
    }
}

// ============================================================================
// MAPPING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInfo {
    pub title: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
}

/// Catalog products keyed by numeric id
pub type ProductMapping = BTreeMap<u32, ProductInfo>;

pub fn create_product_mapping(products: &[CatalogProduct]) -> ProductMapping {
    products
        .iter()
        .map(|p| {
            let info = ProductInfo {
                title: p.title.clone(),
                category: p.category.clone(),
                brand: p.brand.clone(),
                rating: p.rating,
            };
            (p.id, info)
        })
        .collect()
}

/// Numeric catalog id of a product id: "P101" → 101, "101" → 101
pub fn catalog_id(product_id: &str) -> Option<u32> {
    let trimmed = product_id.trim();
    let digits = match trimmed.chars().next() {
        Some('P') | Some('p') => &trimmed[1..],
        _ => trimmed,
    };
    digits.parse().ok()
}

// ============================================================================
// ENRICHMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

/// Copy each record and attach catalog metadata where the id matches
pub fn enrich_sales_data(records: &[Transaction], mapping: &ProductMapping) -> Vec<EnrichedTransaction> {
    records
        .iter()
        .map(|tx| {
            let info = catalog_id(&tx.product_id).and_then(|id| mapping.get(&id));
            EnrichedTransaction {
                transaction: tx.clone(),
                api_category: info.and_then(|i| i.category.clone()),
                api_brand: info.and_then(|i| i.brand.clone()),
                api_rating: info.and_then(|i| i.rating),
                api_match: info.is_some(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentStats {
    pub matched: usize,
    pub total: usize,
    /// Product ids with no catalog entry, sorted
    pub unmatched_products: Vec<String>,
}

impl EnrichmentStats {
    pub fn from_enriched(enriched: &[EnrichedTransaction]) -> Self {
        let unmatched: BTreeSet<&str> = enriched
            .iter()
            .filter(|e| !e.api_match)
            .map(|e| e.transaction.product_id.as_str())
            .collect();

        EnrichmentStats {
            matched: enriched.iter().filter(|e| e.api_match).count(),
            total: enriched.len(),
            unmatched_products: unmatched.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Matched share in percent; 0 when there is nothing to match
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Enriched {}/{} transactions ({:.1}%)",
            self.matched,
            self.total,
            self.match_rate()
        )
    }
}

// ============================================================================
// PERSISTENCE
// ============================================================================

/// Write the enriched records as a pipe-delimited file, returns rows written
pub fn save_enriched_data(path: &Path, enriched: &[EnrichedTransaction]) -> Result<usize> {
    let bytes = render_enriched(enriched)?;
    write_atomic(path, &bytes)?;

    tracing::info!(rows = enriched.len(), path = %path.display(), "saved enriched data");
    Ok(enriched.len())
}

fn render_enriched(enriched: &[EnrichedTransaction]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer
        .write_record(SALES_HEADER.iter().chain(ENRICHMENT_COLUMNS.iter()))
        .context("Failed to write enriched header")?;

    for e in enriched {
        let tx = &e.transaction;
        writer
            .write_record([
                tx.transaction_id.clone(),
                tx.date_string(),
                tx.product_id.clone(),
                tx.product_name.clone(),
                tx.quantity.to_string(),
                format_decimal(tx.unit_price),
                tx.customer_id.clone(),
                tx.region.clone(),
                clean_field(e.api_category.as_deref()),
                clean_field(e.api_brand.as_deref()),
                e.api_rating.map(format_decimal).unwrap_or_default(),
                if e.api_match { "True" } else { "False" }.to_string(),
            ])
            .with_context(|| format!("Failed to write row for {}", tx.transaction_id))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush enriched rows: {}", e.error()))
}

/// Catalog text must not break the pipe layout
fn clean_field(value: Option<&str>) -> String {
    value.unwrap_or_default().replace(['|', '\n', '\r'], " ")
}

// ============================================================================
// TESTS
// ============================================================================
