//! Invoice operations on top of an [`InvoiceStore`]

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;

use crate::core::error::{InvoiceError, InvoiceResult};
use crate::core::invoice::{Invoice, NewInvoice};
use crate::core::store::InvoiceStore;

/// Source of "today" for default invoice dates
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Creates and retrieves invoices
///
/// Invoice numbers are derived from the row count (`INV` + count + 1). The
/// count and the insert run under one mutex, so requests served by this
/// process cannot race each other. Writers outside this process, or rows
/// removed behind its back, can still produce a number that already exists;
/// the store then reports [`InvoiceError::DuplicateInvoiceNumber`].
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
    numbering: Mutex<()>,
    clock: Clock,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self {
            store,
            numbering: Mutex::new(()),
            clock: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Replace the clock used for default invoice dates
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Resolve defaults, assign a number if needed and persist the invoice
    pub async fn create(&self, new: NewInvoice) -> InvoiceResult<Invoice> {
        let _guard = self.numbering.lock().await;

        let existing = if new.explicit_invoice_no().is_some() {
            0
        } else {
            self.store.count().await?
        };

        let record = new.resolve(existing, self.today());
        let invoice_no = record.invoice_no.clone();

        match self.store.insert(record).await {
            Ok(invoice) => {
                tracing::info!(id = invoice.id, invoice_no = %invoice.invoice_no, "invoice created");
                Ok(invoice)
            }
            Err(e @ InvoiceError::DuplicateInvoiceNumber { .. }) => {
                tracing::warn!(invoice_no = %invoice_no, "invoice number already taken");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch one invoice, failing with `NotFound` for an unknown id
    pub async fn get(&self, id: i64) -> InvoiceResult<Invoice> {
        self.store
            .get(id)
            .await?
            .ok_or(InvoiceError::NotFound { id })
    }

    /// All invoices, newest first
    pub async fn list(&self) -> InvoiceResult<Vec<Invoice>> {
        self.store.list().await
    }
}
