//! In-memory implementation of InvoiceStore for testing and development

use crate::core::error::{InvoiceError, InvoiceResult, StorageError};
use crate::core::invoice::{Invoice, InvoiceRecord};
use crate::core::store::InvoiceStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, Invoice>,
    last_id: i64,
}

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Ids are assigned the way an `INTEGER PRIMARY KEY` column would: one more
/// than the highest id ever handed out.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    table: Arc<RwLock<Table>>,
}

impl InMemoryInvoiceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(e: impl std::fmt::Display) -> InvoiceError {
    StorageError::LockPoisoned {
        message: e.to_string(),
    }
    .into()
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn count(&self) -> InvoiceResult<u64> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.len() as u64)
    }

    async fn insert(&self, record: InvoiceRecord) -> InvoiceResult<Invoice> {
        let mut table = self.table.write().map_err(poisoned)?;

        if table
            .rows
            .values()
            .any(|row| row.invoice_no == record.invoice_no)
        {
            return Err(InvoiceError::DuplicateInvoiceNumber {
                invoice_no: record.invoice_no,
            });
        }

        table.last_id += 1;
        let invoice = record.into_invoice(table.last_id);
        table.rows.insert(invoice.id, invoice.clone());

        Ok(invoice)
    }

    async fn get(&self, id: i64) -> InvoiceResult<Option<Invoice>> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn list(&self) -> InvoiceResult<Vec<Invoice>> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.rows.values().rev().cloned().collect())
    }
}
