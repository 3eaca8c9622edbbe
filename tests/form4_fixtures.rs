mod common;

use common::read_fixture;
use insiderkit::{Form4Document, InsiderError};
use pretty_assertions::assert_eq;

#[test]
fn parse_purchase() {
    let content = read_fixture("form4/purchase.xml");
    let doc = Form4Document::parse(&content).unwrap();

    assert_eq!(doc.issuer_name.as_deref(), Some("Apple Inc."));
    assert_eq!(doc.issuer_ticker.as_deref(), Some("AAPL"));
    assert_eq!(doc.owner_name.as_deref(), Some("Doe Jane"));
    assert_eq!(doc.owner_cik.as_deref(), Some("0001214156"));
    assert_eq!(doc.officer_title.as_deref(), Some("Chief Financial Officer"));
    assert!(doc.aff_10b5_one.is_none());

    let txn = doc.transaction.unwrap();
    assert_eq!(txn.date.as_deref(), Some("2024-06-03"));
    assert_eq!(txn.shares.as_deref(), Some("100"));
    assert_eq!(txn.price_per_share.as_deref(), Some("10"));
    assert_eq!(txn.code.as_deref(), Some("P"));
    assert_eq!(txn.shares_owned_after.as_deref(), Some("1100"));
}

#[test]
fn parse_sale_with_plan_flag() {
    let content = read_fixture("form4/sale_with_plan.xml");
    let doc = Form4Document::parse(&content).unwrap();

    assert_eq!(doc.issuer_ticker.as_deref(), Some("MSFT"));
    assert_eq!(doc.aff_10b5_one.as_deref(), Some("true"));
    // A director filing has no officer title
    assert!(doc.officer_title.is_none());

    let txn = doc.transaction.unwrap();
    assert_eq!(txn.code.as_deref(), Some("S"));
    assert_eq!(txn.shares.as_deref(), Some("50"));
    assert_eq!(txn.price_per_share.as_deref(), Some("20"));
}

#[test]
fn non_derivative_wins_over_sibling_derivative() {
    // The derivative table comes first in this fixture; selection must
    // still prefer the non-derivative entry.
    let content = read_fixture("form4/both_tables.xml");
    let doc = Form4Document::parse(&content).unwrap();

    let txn = doc.transaction.unwrap();
    assert_eq!(txn.code.as_deref(), Some("P"));
    assert_eq!(txn.date.as_deref(), Some("2024-05-21"));
    assert_eq!(txn.shares.as_deref(), Some("25"));
    assert_eq!(txn.price_per_share.as_deref(), Some("180.25"));
    assert_eq!(txn.shares_owned_after.as_deref(), Some("1025"));
}

#[test]
fn derivative_entry_stands_in_when_no_non_derivative_exists() {
    let content = read_fixture("form4/derivative_only.xml");
    let doc = Form4Document::parse(&content).unwrap();

    let txn = doc.transaction.unwrap();
    assert_eq!(txn.code.as_deref(), Some("A"));
    assert_eq!(txn.shares.as_deref(), Some("210"));
    // Derivative grants often carry no price
    assert!(txn.price_per_share.is_none());
}

#[test]
fn document_without_transactions_keeps_identity_fields() {
    let content = read_fixture("form4/no_transactions.xml");
    let doc = Form4Document::parse(&content).unwrap();

    assert_eq!(doc.issuer_name.as_deref(), Some("Meta Platforms, Inc."));
    assert_eq!(doc.issuer_ticker.as_deref(), Some("META"));
    assert_eq!(doc.owner_name.as_deref(), Some("Bloggs Joe"));
    assert_eq!(doc.officer_title.as_deref(), Some("Chief Technology Officer"));
    assert!(doc.transaction.is_none());
}

#[test]
fn malformed_document_is_a_parse_error() {
    let content = read_fixture("form4/malformed.xml");
    assert!(matches!(
        Form4Document::parse(&content),
        Err(InsiderError::XmlError(_))
    ));
}
