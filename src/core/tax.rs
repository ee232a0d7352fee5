//! GST computation
//!
//! Intra-state GST is split evenly between the central (CGST) and state
//! (SGST) components. Values are derived from the stored `amount` and
//! `gst_percentage` every time an invoice is rendered and are never persisted,
//! so an old invoice always shows the rate it was created with.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::core::invoice::Invoice;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWO: Decimal = Decimal::TWO;

/// Derived tax amounts for one invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBreakdown {
    pub gst_amount: Decimal,
    pub total_amount: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
}

impl TaxBreakdown {
    /// Compute GST for `amount` at `gst_percentage` percent
    pub fn compute(amount: Decimal, gst_percentage: Decimal) -> Self {
        let gst_amount = amount * gst_percentage / HUNDRED;
        let half = gst_amount / TWO;

        Self {
            gst_amount,
            total_amount: amount + gst_amount,
            cgst: half,
            sgst: half,
        }
    }

    pub fn for_invoice(invoice: &Invoice) -> Self {
        Self::compute(invoice.amount, invoice.gst_percentage)
    }

    /// Amounts formatted for display, two fractional digits
    pub fn display(&self) -> TaxDisplay {
        TaxDisplay {
            gst_amount: format_money(self.gst_amount),
            total_amount: format_money(self.total_amount),
            cgst: format_money(self.cgst),
            sgst: format_money(self.sgst),
        }
    }
}

/// String form of [`TaxBreakdown`] as handed to templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxDisplay {
    pub gst_amount: String,
    pub total_amount: String,
    pub cgst: String,
    pub sgst: String,
}

/// Format a currency value with exactly two fractional digits
///
/// Rounding only affects the returned string.
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
