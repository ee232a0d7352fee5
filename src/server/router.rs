//! Route table

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{
    create_invoice, download_invoice, health_check, list_invoices, new_invoice_form,
};
use crate::server::state::AppState;

/// Build every route of the service:
/// - GET  / - Blank invoice form
/// - POST / - Create an invoice and download its PDF
/// - GET  /invoices - List invoices, newest first
/// - GET  /invoice/{id} - Download the PDF of one invoice
/// - GET  /health, /healthz - Liveness with a store ping
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(new_invoice_form).post(create_invoice))
        .route("/invoices", get(list_invoices))
        .route("/invoice/{id}", get(download_invoice))
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}
