//! # GST Invoice
//!
//! A small web service that issues GST invoices as PDF documents.
//!
//! ## Features
//!
//! - **Sequential Numbering**: `INV0001`, `INV0002`, ... unless a number is given
//! - **Tax Breakdown**: GST split evenly into CGST and SGST, exact decimal arithmetic
//! - **PDF Output**: HTML rendered with tera, converted by `wkhtmltopdf`
//! - **SQLite Storage**: one `invoices` table, created on startup
//! - **Configuration-Based**: YAML file plus environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gst_invoice::prelude::*;
//!
//! let config = AppConfig::load(None)?;
//! let state = AppState::from_config(config).await?;
//! ServerBuilder::new(state).serve().await?;
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod render;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{InvoiceError, InvoiceResult},
        form::InvoiceForm,
        invoice::{Invoice, InvoiceRecord, NewInvoice},
        service::InvoiceService,
        store::InvoiceStore,
        tax::TaxBreakdown,
    };

    // === Rendering ===
    pub use crate::render::{PdfRenderer, TemplateRenderer, WkhtmltopdfRenderer};

    // === Storage ===
    pub use crate::storage::{InMemoryInvoiceStore, SqliteInvoiceStore};

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_router};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use rust_decimal::Decimal;
}
