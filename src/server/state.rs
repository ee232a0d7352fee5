//! Application state shared by every handler
//!
//! `AppState` is the single source of truth for a running server: the
//! configuration it was built from, the invoice service and the two
//! renderers. Everything is behind an `Arc`, so cloning it per request is
//! cheap.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::error::InvoiceResult;
use crate::core::service::InvoiceService;
use crate::core::store::InvoiceStore;
use crate::render::{PdfRenderer, TemplateRenderer, WkhtmltopdfRenderer};
use crate::storage::SqliteInvoiceStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub invoices: Arc<InvoiceService>,
    pub templates: Arc<TemplateRenderer>,
    pub pdf: Arc<dyn PdfRenderer>,
}

impl AppState {
    /// Assemble state from already-built parts
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let state = AppState::new(
    ///     AppConfig::default(),
    ///     Arc::new(InMemoryInvoiceStore::new()),
    ///     TemplateRenderer::embedded()?,
    ///     Arc::new(FakePdf),
    /// );
    /// ```
    pub fn new(
        config: AppConfig,
        store: Arc<dyn InvoiceStore>,
        templates: TemplateRenderer,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            invoices: Arc::new(InvoiceService::new(store)),
            templates: Arc::new(templates),
            pdf,
        }
    }

    /// Replace the invoice service (tests pin its clock this way)
    pub fn with_service(mut self, service: InvoiceService) -> Self {
        self.invoices = Arc::new(service);
        self
    }

    /// Open the SQLite store, load templates and set up `wkhtmltopdf`
    pub async fn from_config(config: AppConfig) -> InvoiceResult<Self> {
        let store = SqliteInvoiceStore::connect(
            &config.database.url,
            config.database.max_connections,
        )
        .await?;

        let templates = match &config.templates.dir {
            Some(dir) => TemplateRenderer::from_dir(dir)?,
            None => TemplateRenderer::embedded()?,
        };

        let pdf = WkhtmltopdfRenderer::new(
            &config.pdf.wkhtmltopdf_path,
            config.pdf.max_concurrent,
            config.pdf.timeout(),
        );

        Ok(Self::new(config, Arc::new(store), templates, Arc::new(pdf)))
    }
}
