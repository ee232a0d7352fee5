//! Storage trait for invoices

use crate::core::error::InvoiceResult;
use crate::core::invoice::{Invoice, InvoiceRecord};
use async_trait::async_trait;

/// Persistence contract for invoices
///
/// Implementations are agnostic to how invoice numbers are chosen; they only
/// have to reject a second row with the same `invoice_no` with
/// [`InvoiceError::DuplicateInvoiceNumber`](crate::core::error::InvoiceError::DuplicateInvoiceNumber).
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Number of stored invoices
    async fn count(&self) -> InvoiceResult<u64>;

    /// Insert a resolved invoice and return it with its assigned id
    async fn insert(&self, record: InvoiceRecord) -> InvoiceResult<Invoice>;

    /// Get an invoice by id
    async fn get(&self, id: i64) -> InvoiceResult<Option<Invoice>>;

    /// All invoices, newest first
    async fn list(&self) -> InvoiceResult<Vec<Invoice>>;

    /// Check that the backend is reachable
    async fn ping(&self) -> InvoiceResult<()> {
        Ok(())
    }
}
