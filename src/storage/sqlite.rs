//! SQLite storage backend using sqlx.
//!
//! Provides `SqliteInvoiceStore`, an [`InvoiceStore`] backed by a local
//! file database through `sqlx::SqlitePool`.
//!
//! # Schema
//!
//! One `invoices` table. `invoice_no` carries a `UNIQUE` constraint, which is
//! the only guard against duplicate numbers. Monetary columns are declared
//! `TEXT` and hold the canonical decimal string: a `NUMERIC` column would let
//! SQLite coerce the value to a binary float.

use std::str::FromStr;

use crate::core::error::{InvoiceError, InvoiceResult, StorageError};
use crate::core::invoice::{Invoice, InvoiceRecord};
use crate::core::store::InvoiceStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

const BACKEND: &str = "SQLite";

const SELECT_COLUMNS: &str = "id, invoice_no, invoice_date, client_name, client_address, \
     client_gstin, subscription_period, amount, gst_percentage, razorpay_txn_id";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Create the `invoices` table if it does not exist.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> InvoiceResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY,
            invoice_no VARCHAR(50) NOT NULL UNIQUE,
            invoice_date DATE NOT NULL,
            client_name VARCHAR(255) NOT NULL,
            client_address TEXT NOT NULL,
            client_gstin VARCHAR(20) NOT NULL,
            subscription_period VARCHAR(50) NOT NULL,
            amount TEXT NOT NULL,
            gst_percentage TEXT NOT NULL DEFAULT '18',
            razorpay_txn_id VARCHAR(100) NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("create invoices table", e))?;

    Ok(())
}

fn query_error(context: &str, e: sqlx::Error) -> InvoiceError {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("Failed to {}: {}", context, e),
    }
    .into()
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    invoice_no: String,
    invoice_date: NaiveDate,
    client_name: String,
    client_address: String,
    client_gstin: String,
    subscription_period: String,
    amount: String,
    gst_percentage: String,
    razorpay_txn_id: String,
}

fn parse_decimal(column: &str, id: i64, raw: &str) -> InvoiceResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        StorageError::IntegrityError {
            message: format!("invoice {} has invalid {} '{}': {}", id, column, raw, e),
        }
        .into()
    })
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = InvoiceError;

    fn try_from(row: InvoiceRow) -> InvoiceResult<Self> {
        Ok(Invoice {
            amount: parse_decimal("amount", row.id, &row.amount)?,
            gst_percentage: parse_decimal("gst_percentage", row.id, &row.gst_percentage)?,
            id: row.id,
            invoice_no: row.invoice_no,
            invoice_date: row.invoice_date,
            client_name: row.client_name,
            client_address: row.client_address,
            client_gstin: row.client_gstin,
            subscription_period: row.subscription_period,
            razorpay_txn_id: row.razorpay_txn_id,
        })
    }
}

// ---------------------------------------------------------------------------
// SqliteInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by SQLite.
///
/// # Example
///
/// ```rust,ignore
/// let store = SqliteInvoiceStore::connect("sqlite://invoices.db", 5).await?;
/// let invoice = store.insert(record).await?;
/// ```
#[derive(Clone, Debug)]
pub struct SqliteInvoiceStore {
    pool: SqlitePool,
}

impl SqliteInvoiceStore {
    /// Wrap an existing pool. The schema must already exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `url` and apply the schema
    pub async fn connect(url: &str, max_connections: u32) -> InvoiceResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| connection_error(url, e))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| connection_error(url, e))?;

        ensure_schema(&pool).await?;
        tracing::info!(url = %url, "SQLite invoice store ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connection_error(url: &str, e: sqlx::Error) -> InvoiceError {
    StorageError::ConnectionError {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", url, e),
    }
    .into()
}

#[async_trait]
impl InvoiceStore for SqliteInvoiceStore {
    async fn count(&self) -> InvoiceResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("count invoices", e))?;

        Ok(count as u64)
    }

    async fn insert(&self, record: InvoiceRecord) -> InvoiceResult<Invoice> {
        let result = sqlx::query(
            "INSERT INTO invoices (invoice_no, invoice_date, client_name, client_address,
                client_gstin, subscription_period, amount, gst_percentage, razorpay_txn_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.invoice_no)
        .bind(record.invoice_date)
        .bind(&record.client_name)
        .bind(&record.client_address)
        .bind(&record.client_gstin)
        .bind(&record.subscription_period)
        .bind(record.amount.to_string())
        .bind(record.gst_percentage.to_string())
        .bind(&record.razorpay_txn_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                InvoiceError::DuplicateInvoiceNumber {
                    invoice_no: record.invoice_no.clone(),
                }
            }
            _ => query_error("insert invoice", e),
        })?;

        Ok(record.into_invoice(result.last_insert_rowid()))
    }

    async fn get(&self, id: i64) -> InvoiceResult<Option<Invoice>> {
        let sql = format!("SELECT {} FROM invoices WHERE id = ?", SELECT_COLUMNS);
        let row: Option<InvoiceRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("fetch invoice", e))?;

        row.map(Invoice::try_from).transpose()
    }

    async fn list(&self) -> InvoiceResult<Vec<Invoice>> {
        let sql = format!("SELECT {} FROM invoices ORDER BY id DESC", SELECT_COLUMNS);
        let rows: Vec<InvoiceRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("list invoices", e))?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn ping(&self) -> InvoiceResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("ping database", e))?;
        Ok(())
    }
}
