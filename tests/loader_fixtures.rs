mod common;

use common::read_fixture;
use insiderkit::{Loader, TransactionStore};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

async fn store_in(dir: &std::path::Path) -> TransactionStore {
    TransactionStore::open(dir.join("insider_trading.db"))
        .await
        .unwrap()
}

fn stage_fixture(filings_dir: &std::path::Path, bucket: &str, filename: &str, fixture: &str) {
    let dir = filings_dir.join(bucket);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(filename), read_fixture(fixture)).unwrap();
}

#[tokio::test]
async fn loads_purchase_and_sale_end_to_end() {
    let scratch = tempdir().unwrap();
    let filings_dir = scratch.path().join("filings");
    stage_fixture(&filings_dir, "Apple Inc.", "320193-0001-form4.xml", "form4/purchase.xml");
    stage_fixture(
        &filings_dir,
        "MICROSOFT CORP",
        "789019-0002-form4.xml",
        "form4/sale_with_plan.xml",
    );

    let store = store_in(scratch.path()).await;
    let report = Loader::new(store.clone(), &filings_dir).load_all().await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.errors, 0);
    assert_eq!(store.count().await.unwrap(), 2);

    let purchases = store.records_for_ticker("AAPL").await.unwrap();
    assert_eq!(purchases.len(), 1);
    let purchase = &purchases[0];
    assert_eq!(purchase.issuer_name.as_deref(), Some("Apple Inc."));
    assert_eq!(purchase.reporting_owner.as_deref(), Some("Doe Jane"));
    assert_eq!(purchase.reporting_owner_cik.as_deref(), Some("0001214156"));
    assert_eq!(
        purchase.reporting_owner_position.as_deref(),
        Some("Chief Financial Officer")
    );
    assert_eq!(purchase.transaction_date.as_deref(), Some("2024-06-03"));
    assert_eq!(purchase.transaction_shares.as_deref(), Some("100"));
    assert_eq!(purchase.transaction_price.as_deref(), Some("10"));
    assert_eq!(purchase.transaction_type.as_deref(), Some("P"));
    assert_eq!(purchase.shares_after_transaction.as_deref(), Some("1100"));
    assert!(purchase.aff_10b5_one.is_none());
    assert!(purchase.source_file.ends_with("320193-0001-form4.xml"));

    let sales = store.records_for_ticker("MSFT").await.unwrap();
    assert_eq!(sales.len(), 1);
    let sale = &sales[0];
    assert_eq!(sale.transaction_type.as_deref(), Some("S"));
    assert_eq!(sale.transaction_shares.as_deref(), Some("50"));
    assert_eq!(sale.transaction_price.as_deref(), Some("20"));
    assert_eq!(sale.aff_10b5_one.as_deref(), Some("true"));
}

#[tokio::test]
async fn malformed_document_counts_one_error_and_inserts_nothing() {
    let scratch = tempdir().unwrap();
    let filings_dir = scratch.path().join("filings");
    stage_fixture(&filings_dir, "unknown", "1-1-broken.xml", "form4/malformed.xml");

    let store = store_in(scratch.path()).await;
    let report = Loader::new(store.clone(), &filings_dir).load_all().await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.errors, 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn transactionless_document_still_inserts_a_row() {
    let scratch = tempdir().unwrap();
    let filings_dir = scratch.path().join("filings");
    stage_fixture(
        &filings_dir,
        "Meta Platforms, Inc.",
        "1326801-0003-form4.xml",
        "form4/no_transactions.xml",
    );

    let store = store_in(scratch.path()).await;
    let report = Loader::new(store.clone(), &filings_dir).load_all().await.unwrap();

    assert_eq!(report.processed, 1);
    let records = store.records_for_ticker("META").await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].transaction_date.is_none());
    assert!(records[0].transaction_shares.is_none());
    assert!(records[0].transaction_price.is_none());
    assert!(records[0].transaction_type.is_none());
    assert!(records[0].shares_after_transaction.is_none());
}

#[tokio::test]
async fn rerunning_the_loader_duplicates_rows() {
    let scratch = tempdir().unwrap();
    let filings_dir = scratch.path().join("filings");
    stage_fixture(&filings_dir, "Apple Inc.", "320193-0001-form4.xml", "form4/purchase.xml");

    let store = store_in(scratch.path()).await;
    let loader = Loader::new(store.clone(), &filings_dir);
    loader.load_all().await.unwrap();
    loader.load_all().await.unwrap();

    // No natural key across passes; duplication is the documented behavior.
    assert_eq!(store.count().await.unwrap(), 2);
}
