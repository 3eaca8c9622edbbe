//! Locator and company resolution against a mock submissions endpoint.

use chrono::{Days, Utc};
use insiderkit::{
    CompanyOperations, Edgar, EdgarUrls, FilingLocator, PipelineConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Semaphore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Edgar {
    let config = PipelineConfig {
        base_urls: EdgarUrls {
            archives: format!("{}/Archives/edgar", server.uri()),
            data: server.uri(),
            files: server.uri(),
        },
        ..PipelineConfig::default()
    };
    Edgar::with_config(&config).unwrap()
}

fn days_ago(days: u64) -> String {
    Utc::now()
        .date_naive()
        .checked_sub_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn locator_filters_by_form_and_lookback_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000320193.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cik": "320193",
            "name": "Apple Inc.",
            "tickers": ["AAPL"],
            "filings": {
                "recent": {
                    "accessionNumber": [
                        "0000320193-24-000100",
                        "0000320193-24-000090",
                        "0000320193-24-000080",
                        "0000320193-24-000070"
                    ],
                    "filingDate": [days_ago(4), days_ago(29), days_ago(59), days_ago(2)],
                    "reportDate": [days_ago(5), days_ago(30), days_ago(60), days_ago(3)],
                    "form": ["4", "4", "4", "10-K"],
                    "primaryDocument": [
                        "xslF345X05/wk-form4_1.xml",
                        "xslF345X05/wk-form4_2.xml",
                        "xslF345X05/wk-form4_3.xml",
                        "aapl-10k.htm"
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    // Lookback of 30 days: the 5-day-old filing survives, the 30-day-old
    // one sits exactly on the cutoff and is excluded, the 60-day-old one is
    // stale, and the 10-K has the wrong form.
    let locator = FilingLocator::new(client.clone(), 30, 50, 10);
    let semaphore = Arc::new(Semaphore::new(5));

    let refs = locator.locate("AAPL", 320193, &semaphore).await;

    assert_eq!(refs.len(), 1);
    assert_eq!(
        refs[0].url,
        format!(
            "{}/Archives/edgar/data/320193/000032019324000100/xslF345X05/wk-form4_1.xml",
            server.uri()
        )
    );
    assert_eq!(refs[0].ticker, "AAPL");
    assert_eq!(refs[0].cik, 320193);
}

#[tokio::test]
async fn per_company_failure_yields_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000000999.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let locator = FilingLocator::new(client_for(&server), 30, 50, 10);
    let semaphore = Arc::new(Semaphore::new(5));

    let refs = locator.locate("GHOST", 999, &semaphore).await;
    assert!(refs.is_empty());
}

#[tokio::test]
async fn ticker_map_resolves_normalized_symbols() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company_tickers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "0": {"cik_str": 320193u64, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 1067983u64, "ticker": "BRK-B", "title": "BERKSHIRE HATHAWAY INC"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let map = client.ticker_map().await.unwrap();
    assert_eq!(map.get("AAPL"), Some(&320193));

    // Dotted class-share symbols resolve against the dashed SEC spelling
    assert_eq!(client.company_cik("BRK.B").await.unwrap(), 1067983);
}
