//! Storage implementations for different backends

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryInvoiceStore;
pub use sqlite::SqliteInvoiceStore;
