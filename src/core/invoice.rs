//! The invoice entity and its default-value rules

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prefix of generated invoice numbers
pub const INVOICE_NO_PREFIX: &str = "INV";

/// Stored when the client has no GST registration
pub const UNREGISTERED_GSTIN: &str = "Unregistered";

/// GST rate applied when none is given
pub const DEFAULT_GST_PERCENTAGE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// A persisted invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub client_name: String,
    pub client_address: String,
    pub client_gstin: String,
    pub subscription_period: String,
    pub amount: Decimal,
    pub gst_percentage: Decimal,
    pub razorpay_txn_id: String,
}

/// Invoice details as submitted, before defaults are applied
///
/// Fields left as `None` fall back to the documented defaults in
/// [`NewInvoice::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewInvoice {
    pub invoice_no: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub client_name: String,
    pub client_address: String,
    pub client_gstin: Option<String>,
    pub subscription_period: String,
    pub amount: Decimal,
    pub gst_percentage: Option<Decimal>,
    pub razorpay_txn_id: Option<String>,
}

/// A fully resolved invoice row, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub client_name: String,
    pub client_address: String,
    pub client_gstin: String,
    pub subscription_period: String,
    pub amount: Decimal,
    pub gst_percentage: Decimal,
    pub razorpay_txn_id: String,
}

impl InvoiceRecord {
    /// Attach the store-assigned id
    pub fn into_invoice(self, id: i64) -> Invoice {
        Invoice {
            id,
            invoice_no: self.invoice_no,
            invoice_date: self.invoice_date,
            client_name: self.client_name,
            client_address: self.client_address,
            client_gstin: self.client_gstin,
            subscription_period: self.subscription_period,
            amount: self.amount,
            gst_percentage: self.gst_percentage,
            razorpay_txn_id: self.razorpay_txn_id,
        }
    }
}

/// Build an invoice number from a 1-based sequence (`INV0001`)
pub fn format_invoice_number(sequence: u64) -> String {
    format!("{}{:04}", INVOICE_NO_PREFIX, sequence)
}

/// Trimmed value, or `None` when the input is missing or blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NewInvoice {
    /// The caller-supplied invoice number, if any
    pub fn explicit_invoice_no(&self) -> Option<String> {
        non_blank(self.invoice_no.clone())
    }

    /// Apply defaults
    ///
    /// `existing_count` is the number of invoices stored before this one and
    /// only matters when no invoice number was supplied. `today` stands in for
    /// a missing invoice date.
    pub fn resolve(self, existing_count: u64, today: NaiveDate) -> InvoiceRecord {
        let invoice_no = self
            .explicit_invoice_no()
            .unwrap_or_else(|| format_invoice_number(existing_count + 1));

        InvoiceRecord {
            invoice_no,
            invoice_date: self.invoice_date.unwrap_or(today),
            client_name: self.client_name,
            client_address: self.client_address,
            client_gstin: self
                .client_gstin
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| UNREGISTERED_GSTIN.to_string()),
            subscription_period: self.subscription_period,
            amount: self.amount,
            gst_percentage: self.gst_percentage.unwrap_or(DEFAULT_GST_PERCENTAGE),
            razorpay_txn_id: self.razorpay_txn_id.unwrap_or_default(),
        }
    }
}
