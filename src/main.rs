use axum::{
    routing::{get, post},
    Router,
};
use nfe_costing::{api, AppConfig, DocumentStore};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // Loaded-document set shared by ingestion and aggregation routes
    let store = Arc::new(DocumentStore::new());

    let document_routes = Router::new()
        .route("/api/documents/resolve", post(api::resolve))
        .route("/api/documents/batch", post(api::ingest_batch))
        .route("/api/documents", get(api::list_documents))
        .route("/api/aggregate/duplicates", get(api::aggregate_duplicates))
        .route("/api/aggregate/search", get(api::aggregate_search))
        .with_state(store);

    // Pure computation routes: no shared state
    let engine_routes = Router::new()
        .route("/api/costing", post(api::costing))
        .route("/api/simulate", post(api::simulate))
        .route("/api/pricing/resolve", post(api::pricing_resolve))
        .route("/api/pricing/global-margin", post(api::pricing_global_margin))
        .route("/api/pricing/totals", post(api::pricing_totals));

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(document_routes)
        .merge(engine_routes)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/documents/resolve     - resolve one parsed invoice tree");
    info!("  POST /api/documents/batch       - resolve and load a batch of trees");
    info!("  GET  /api/documents             - identities of loaded documents");
    info!("  POST /api/costing               - allocation + landed cost per line");
    info!("  POST /api/simulate              - purchase quantity simulation");
    info!("  GET  /api/aggregate/duplicates  - products present in >=2 documents");
    info!("  GET  /api/aggregate/search?q=   - free-text product search");
    info!("  POST /api/pricing/*             - batch pricing resolver");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
