//! HTTP handlers for the invoice pages
//!
//! The HTML surface keeps validation failures inside the form: a bad
//! submission comes back as the same page with messages, never as an error
//! status. Everything else that goes wrong maps through
//! [`InvoiceError`](crate::core::error::InvoiceError)'s `IntoResponse`.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::core::error::InvoiceResult;
use crate::core::form::{InvoiceForm, errors_by_field};
use crate::core::invoice::Invoice;
use crate::render::attachment_filename;
use crate::server::state::AppState;

pub const SERVICE_NAME: &str = "gst-invoice";

/// `GET /`: the blank creation form
pub async fn new_invoice_form(State(state): State<AppState>) -> InvoiceResult<Html<String>> {
    let form = InvoiceForm::with_defaults(state.invoices.today());
    let html = state.templates.render_form(&form, &Default::default())?;
    Ok(Html(html))
}

/// `POST /`: validate, persist, then answer with the PDF
pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceForm>,
) -> InvoiceResult<Response> {
    let new = match form.parse() {
        Ok(new) => new,
        Err(errors) => {
            tracing::debug!(fields = ?errors.fields(), "invoice form rejected");
            let html = state.templates.render_form(&form, &errors_by_field(&errors))?;
            return Ok(Html(html).into_response());
        }
    };

    let invoice = state.invoices.create(new).await?;
    pdf_response(&state, &invoice).await
}

/// `GET /invoices`: every invoice, newest first
pub async fn list_invoices(State(state): State<AppState>) -> InvoiceResult<Html<String>> {
    let invoices = state.invoices.list().await?;
    let html = state.templates.render_list(&invoices)?;
    Ok(Html(html))
}

/// `GET /invoice/{id}`: regenerate the PDF of a stored invoice
pub async fn download_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> InvoiceResult<Response> {
    let invoice = state.invoices.get(id).await?;
    pdf_response(&state, &invoice).await
}

/// `GET /health` and `GET /healthz`
pub async fn health_check(State(state): State<AppState>) -> InvoiceResult<Json<Value>> {
    state.invoices.store().ping().await?;
    Ok(Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    })))
}

async fn pdf_response(state: &AppState, invoice: &Invoice) -> InvoiceResult<Response> {
    let html = state.templates.render_invoice(invoice)?;
    let pdf = state.pdf.render(&html).await?;

    tracing::info!(id = invoice.id, invoice_no = %invoice.invoice_no, bytes = pdf.len(), "serving invoice PDF");

    let disposition = format!(
        "attachment; filename={}",
        attachment_filename(&invoice.invoice_no)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
