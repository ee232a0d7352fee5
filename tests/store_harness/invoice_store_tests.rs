//! Macro-generated test suite for `InvoiceStore` contract validation.
//!
//! # Generated Tests
//!
//! ## Basics
//! - `test_count_empty` - a fresh store holds no invoices
//! - `test_insert_and_get` - every stored field comes back unchanged
//! - `test_get_nonexistent` - unknown id returns None
//! - `test_ids_increase` - each insert gets a larger id
//! - `test_list_newest_first` - list is ordered by descending id
//!
//! ## Edge Cases
//! - `test_decimals_are_exact` - amounts survive without float rounding
//! - `test_duplicate_invoice_no_rejected` - unique invoice numbers
//! - `test_ping`
//! - `test_concurrent_inserts` - parallel inserts from spawned tasks
//!
//! ## Service
//! - `test_service_numbering` - `InvoiceService` numbers from the row count

/// Generate the `InvoiceStore` conformance suite.
///
/// `$factory` must be an expression that evaluates to a store. It is
/// re-evaluated for each test (inside an async test body, so `.await` is
/// allowed) to keep tests isolated. The store must be `Send + Sync + 'static`.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use gst_invoice::core::error::InvoiceError;
            use gst_invoice::core::invoice::NewInvoice;
            use gst_invoice::core::service::InvoiceService;
            use gst_invoice::core::store::InvoiceStore;
            use std::collections::HashSet;
            use std::sync::Arc;

            #[tokio::test]
            async fn test_count_empty() {
                let store = $factory;
                assert_eq!(store.count().await.unwrap(), 0);
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_insert_and_get() {
                let store = $factory;
                let record = sample_record("INV0001", "Acme Analytics");

                let created = store.insert(record.clone()).await.unwrap();
                assert_eq!(created, record.clone().into_invoice(created.id));

                let fetched = store.get(created.id).await.unwrap();
                assert_eq!(fetched, Some(created));
                assert_eq!(store.count().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                store.insert(sample_record("INV0001", "A")).await.unwrap();

                assert!(store.get(9999).await.unwrap().is_none());
                assert!(store.get(-1).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_ids_increase() {
                let store = $factory;
                let mut last = 0;
                for record in sample_batch(3) {
                    let created = store.insert(record).await.unwrap();
                    assert!(created.id > last, "ids must increase");
                    last = created.id;
                }
                assert_eq!(store.count().await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let store = $factory;
                for record in sample_batch(4) {
                    store.insert(record).await.unwrap();
                }

                let numbers: Vec<String> = store
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|invoice| invoice.invoice_no)
                    .collect();
                assert_eq!(numbers, vec!["INV0004", "INV0003", "INV0002", "INV0001"]);
            }

            #[tokio::test]
            async fn test_decimals_are_exact() {
                let store = $factory;
                let created = store.insert(precise_record("INV0001")).await.unwrap();

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.amount, amount("99999999.99"));
                assert_eq!(fetched.gst_percentage, amount("12.25"));
                assert_eq!(fetched.amount.to_string(), "99999999.99");
            }

            #[tokio::test]
            async fn test_duplicate_invoice_no_rejected() {
                let store = $factory;
                store.insert(sample_record("INV0042", "First")).await.unwrap();

                let err = store
                    .insert(sample_record("INV0042", "Second"))
                    .await
                    .unwrap_err();
                match err {
                    InvoiceError::DuplicateInvoiceNumber { invoice_no } => {
                        assert_eq!(invoice_no, "INV0042")
                    }
                    other => panic!("expected DuplicateInvoiceNumber, got {:?}", other),
                }
                assert_eq!(store.count().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_ping() {
                let store = $factory;
                store.ping().await.unwrap();
            }

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = Arc::new($factory);
                let mut handles = Vec::new();

                for record in sample_batch(10) {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move { store.insert(record).await }));
                }

                let mut ids = HashSet::new();
                for handle in handles {
                    let created = handle.await.unwrap().unwrap();
                    assert!(ids.insert(created.id), "duplicate id {}", created.id);
                }
                assert_eq!(store.count().await.unwrap(), 10);
            }

            #[tokio::test]
            async fn test_service_numbering() {
                let service = InvoiceService::new(Arc::new($factory)).with_clock(sample_date);

                let mut numbers = Vec::new();
                for client in ["A", "B", "C"] {
                    let invoice = service
                        .create(NewInvoice {
                            client_name: client.to_string(),
                            client_address: "Pune".to_string(),
                            subscription_period: "Monthly".to_string(),
                            amount: amount("500"),
                            ..Default::default()
                        })
                        .await
                        .unwrap();
                    numbers.push(invoice.invoice_no);
                }

                assert_eq!(numbers, vec!["INV0001", "INV0002", "INV0003"]);
                let listed = service.list().await.unwrap();
                assert_eq!(listed[0].invoice_no, "INV0003");
                assert_eq!(listed[0].client_gstin, "Unregistered");
                assert_eq!(listed[0].razorpay_txn_id, "");
            }
        }
    };
}
