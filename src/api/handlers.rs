use crate::models::{
    AggregatedProduct, AllocatedLineItem, DocumentFile, DocumentIdentity, IngestReport,
    InvoiceTotals, LineItem, PricingField, PricingRow, PricingTotals, SimulatedLineItem,
    SimulationSummary, TaxRegime,
};
use crate::resolver::resolve_document;
use crate::service::{self, DocumentStore};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Request body: one parsed document tree.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub source: String,
    pub tree: Value,
}

/// Request body: batch of parsed document trees.
#[derive(Debug, Deserialize)]
pub struct BatchIngestRequest {
    pub files: Vec<DocumentFile>,
}

#[derive(Debug, Deserialize)]
pub struct CostingRequest {
    pub totals: InvoiceTotals,
    pub items: Vec<LineItem>,
    pub regime: TaxRegime,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub items: Vec<AllocatedLineItem>,
    pub quantities: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub items: Vec<SimulatedLineItem>,
    pub summary: SimulationSummary,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct PricingResolveRequest {
    pub row: PricingRow,
    pub changed: PricingField,
}

#[derive(Debug, Deserialize)]
pub struct GlobalMarginRequest {
    pub rows: Vec<PricingRow>,
    pub margin: String,
}

#[derive(Debug, Deserialize)]
pub struct PricingTotalsRequest {
    pub rows: Vec<PricingRow>,
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Batch response envelope with the ingestion report.
#[derive(Debug, Serialize)]
pub struct BatchIngestResponse {
    pub success: bool,
    pub message: String,
    pub report: IngestReport,
}

/// Health check.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Resolves a single parsed tree without loading it into the store.
pub async fn resolve(Json(req): Json<ResolveRequest>) -> Response {
    match resolve_document(&req.source, &req.tree) {
        Ok(doc) => (StatusCode::OK, Json(doc)).into_response(),
        Err(e) => {
            let response = ErrorResponse {
                success: false,
                message: e.to_string(),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response()
        }
    }
}

/// Resolves and loads a batch of trees; duplicates skip, failures are
/// reported per file.
pub async fn ingest_batch(
    State(store): State<Arc<DocumentStore>>,
    Json(req): Json<BatchIngestRequest>,
) -> Response {
    let total = req.files.len();
    let report = store.ingest_batch(req.files).await;
    let response = BatchIngestResponse {
        success: report.failures.is_empty(),
        message: format!(
            "{} of {} documents loaded ({} duplicates, {} failures)",
            report.loaded,
            total,
            report.skipped_duplicates,
            report.failures.len()
        ),
        report,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Identities of the currently loaded documents.
pub async fn list_documents(State(store): State<Arc<DocumentStore>>) -> Json<Vec<DocumentIdentity>> {
    Json(store.identities().await)
}

/// Allocation + landed cost for one document's lines under a regime.
pub async fn costing(Json(req): Json<CostingRequest>) -> Json<Vec<AllocatedLineItem>> {
    Json(service::allocate_and_cost(&req.totals, &req.items, req.regime))
}

/// Purchase simulation over already-costed lines.
pub async fn simulate(Json(req): Json<SimulateRequest>) -> Json<SimulateResponse> {
    let items = service::simulate(&req.items, &req.quantities);
    let summary = service::summarize(&items);
    Json(SimulateResponse { items, summary })
}

/// Products present in two or more loaded documents.
pub async fn aggregate_duplicates(
    State(store): State<Arc<DocumentStore>>,
) -> Json<Vec<AggregatedProduct>> {
    Json(store.duplicates().await)
}

/// Free-text product search over the loaded documents.
pub async fn aggregate_search(
    State(store): State<Arc<DocumentStore>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<AggregatedProduct>> {
    Json(store.search(&params.q).await)
}

/// Re-solves one pricing row after a field edit.
pub async fn pricing_resolve(Json(req): Json<PricingResolveRequest>) -> Json<PricingRow> {
    Json(service::pricing::resolve_row(&req.row, req.changed))
}

/// Applies one margin to every row with a positive cost.
pub async fn pricing_global_margin(Json(req): Json<GlobalMarginRequest>) -> Json<Vec<PricingRow>> {
    Json(service::pricing::apply_global_margin(&req.rows, &req.margin))
}

/// Totals over a pricing list.
pub async fn pricing_totals(Json(req): Json<PricingTotalsRequest>) -> Json<PricingTotals> {
    Json(service::pricing::totals(&req.rows))
}
