use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One parsed document handed to batch ingestion, tagged with its source
/// name (usually the file name) for error attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub source: String,
    pub tree: Value,
}

/// One product occurrence inside one contributing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOccurrence {
    pub access_key: String,
    pub invoice_number: String,
    pub emitter: String,
    pub quantity: BigDecimal,
    pub unit_cost: BigDecimal,
}

/// A product merged across the loaded document set. Rebuilt from scratch on
/// every aggregation or search call; carries no identity between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProduct {
    pub product_code: String,
    pub description: String,
    pub total_quantity: BigDecimal,
    pub total_value: BigDecimal,
    pub document_count: usize,
    pub occurrences: Vec<ProductOccurrence>,
}

/// Per-file resolution failure inside a batch; the batch itself continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    pub source: String,
    pub error: String,
}

/// Outcome of a batch ingestion. Duplicates are skips, not failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub loaded: usize,
    pub skipped_duplicates: usize,
    pub failures: Vec<IngestFailure>,
}
