//! Universe providers against a mock HTTP server.

mod common;

use insiderkit::{DEFAULT_TICKERS, RemoteUniverse, UniverseProvider};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn remote_universe_parses_constituents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/constituents.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Symbol,Name,Sector\nAAPL,Apple Inc.,Technology\nBRK.B,Berkshire Hathaway,Financials\n",
        ))
        .mount(&server)
        .await;

    let universe = RemoteUniverse::new(common::edgar(), format!("{}/constituents.csv", server.uri()));
    let tickers = universe.tickers().await.unwrap();

    assert_eq!(tickers, vec!["AAPL", "BRK-B"]);
}

#[tokio::test]
async fn remote_failure_falls_back_to_default_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/constituents.csv"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let universe = RemoteUniverse::new(common::edgar(), format!("{}/constituents.csv", server.uri()));
    let tickers = universe.tickers().await.unwrap();

    assert_eq!(tickers, DEFAULT_TICKERS.to_vec());
}

#[tokio::test]
async fn missing_symbol_column_falls_back_to_default_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/constituents.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ticker,Name\nAAPL,Apple Inc.\n"))
        .mount(&server)
        .await;

    let universe = RemoteUniverse::new(common::edgar(), format!("{}/constituents.csv", server.uri()));
    let tickers = universe.tickers().await.unwrap();

    assert_eq!(tickers, DEFAULT_TICKERS.to_vec());
}
