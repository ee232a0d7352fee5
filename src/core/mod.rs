//! Core module containing the invoice domain: model, numbering, tax and validation

pub mod error;
pub mod form;
pub mod invoice;
pub mod service;
pub mod store;
pub mod tax;

pub use error::{InvoiceError, InvoiceResult};
pub use form::InvoiceForm;
pub use invoice::{Invoice, InvoiceRecord, NewInvoice};
pub use service::InvoiceService;
pub use store::InvoiceStore;
pub use tax::TaxBreakdown;
