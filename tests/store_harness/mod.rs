//! Shared test harness for invoice store backends
//!
//! Provides record builders and the `invoice_store_tests!` macro that runs
//! the `InvoiceStore` contract against any backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! invoice_store_tests!(InMemoryInvoiceStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod invoice_store_tests;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use gst_invoice::core::invoice::{InvoiceRecord, format_invoice_number};

pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

/// A fully populated record with the given number and client
pub fn sample_record(invoice_no: &str, client_name: &str) -> InvoiceRecord {
    InvoiceRecord {
        invoice_no: invoice_no.to_string(),
        invoice_date: sample_date(),
        client_name: client_name.to_string(),
        client_address: "221B Residency Road\nBengaluru 560025".to_string(),
        client_gstin: "29ABCDE1234F1Z5".to_string(),
        subscription_period: "Apr 2024 - Mar 2025".to_string(),
        amount: dec!(1000.00),
        gst_percentage: dec!(18),
        razorpay_txn_id: "pay_NXk2abc".to_string(),
    }
}

/// Record with awkward decimals that a float column would not keep exactly
pub fn precise_record(invoice_no: &str) -> InvoiceRecord {
    InvoiceRecord {
        amount: dec!(99999999.99),
        gst_percentage: dec!(12.25),
        ..sample_record(invoice_no, "Precise Pvt Ltd")
    }
}

/// `count` records numbered `INV0001`, `INV0002`, ...
pub fn sample_batch(count: u64) -> Vec<InvoiceRecord> {
    (1..=count)
        .map(|n| sample_record(&format_invoice_number(n), &format!("Client {}", n)))
        .collect()
}

pub fn amount(value: &str) -> Decimal {
    value.parse().unwrap()
}
