//! Persistent transaction store.
//!
//! One SQLite table holds every extracted transaction record. All
//! transaction fields are loosely-typed TEXT so the original string
//! formatting of numbers and dates survives the write; the screen queries
//! CAST at read time instead. There is deliberately no uniqueness
//! constraint: re-running the loader over an unchanged document tree
//! appends duplicate rows.

use super::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;

/// One normalized transaction, as extracted from a single document.
///
/// Every field except `source_file` may be absent; absence is recorded as
/// NULL, never as a sentinel string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecord {
    pub issuer_name: Option<String>,
    pub issuer_ticker: Option<String>,
    pub reporting_owner: Option<String>,
    pub reporting_owner_cik: Option<String>,
    pub reporting_owner_position: Option<String>,
    pub transaction_date: Option<String>,
    pub transaction_shares: Option<String>,
    pub transaction_price: Option<String>,
    pub transaction_type: Option<String>,
    pub shares_after_transaction: Option<String>,
    pub aff_10b5_one: Option<String>,
    pub source_file: String,
}

/// A cluster-buy hit: several distinct insiders buying the same issuer
/// within a short window.
#[derive(Debug, Clone)]
pub struct ClusterBuy {
    pub ticker: Option<String>,
    pub transaction_date: Option<String>,
    pub insider_count: i64,
    pub total_shares: Option<f64>,
    pub total_value: Option<f64>,
}

/// A single purchase above the dollar-value threshold.
#[derive(Debug, Clone)]
pub struct LargePurchase {
    pub ticker: Option<String>,
    pub transaction_date: Option<String>,
    pub reporting_owner: Option<String>,
    pub reporting_owner_position: Option<String>,
    pub dollar_value: f64,
}

/// An insider with repeated purchases of the same issuer.
#[derive(Debug, Clone)]
pub struct RepeatBuyer {
    pub ticker: Option<String>,
    pub reporting_owner: Option<String>,
    pub buy_count: i64,
}

/// Handle to the SQLite store.
#[derive(Clone)]
pub struct TransactionStore {
    pool: SqlitePool,
}

impl TransactionStore {
    /// Opens (creating if missing) the database and ensures the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path.as_ref())
                    .create_if_missing(true),
            )
            .await?;

        // WAL lets the screeners read while a load pass is writing
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS insider_trading (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                issuer_name TEXT,
                issuer_ticker TEXT,
                reporting_owner TEXT,
                reporting_owner_cik TEXT,
                reporting_owner_position TEXT,
                transaction_date TEXT,
                transaction_shares TEXT,
                transaction_price TEXT,
                transaction_type TEXT,
                shares_after_transaction TEXT,
                aff10b5One TEXT,
                source_file TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_issuer_ticker ON insider_trading (issuer_ticker)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transaction_date ON insider_trading (transaction_date)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_reporting_owner ON insider_trading (reporting_owner)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends one record. A single INSERT, so a crash mid-pass can lose
    /// rows but never write a partial one.
    pub async fn insert(&self, record: &TransactionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO insider_trading
                (issuer_name, issuer_ticker, reporting_owner, reporting_owner_cik,
                 reporting_owner_position, transaction_date, transaction_shares,
                 transaction_price, transaction_type, shares_after_transaction,
                 aff10b5One, source_file)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&record.issuer_name)
        .bind(&record.issuer_ticker)
        .bind(&record.reporting_owner)
        .bind(&record.reporting_owner_cik)
        .bind(&record.reporting_owner_position)
        .bind(&record.transaction_date)
        .bind(&record.transaction_shares)
        .bind(&record.transaction_price)
        .bind(&record.transaction_type)
        .bind(&record.shares_after_transaction)
        .bind(&record.aff_10b5_one)
        .bind(&record.source_file)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Total number of stored records.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM insider_trading")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Fetches all records for a ticker, newest transaction first.
    pub async fn records_for_ticker(&self, ticker: &str) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT issuer_name, issuer_ticker, reporting_owner, reporting_owner_cik,
                   reporting_owner_position, transaction_date, transaction_shares,
                   transaction_price, transaction_type, shares_after_transaction,
                   aff10b5One, source_file
            FROM insider_trading
            WHERE issuer_ticker = ?1
            ORDER BY transaction_date DESC
            "#,
        )
        .bind(ticker)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Multiple distinct officers buying the same issuer within a day
    /// window, unplanned trades only (no 10b5-1 affirmation).
    pub async fn cluster_buys(
        &self,
        min_insiders: i64,
        window_days: i64,
        transaction_type: &str,
    ) -> Result<Vec<ClusterBuy>> {
        let rows = sqlx::query(
            r#"
            SELECT
                f1.issuer_ticker AS ticker,
                f1.transaction_date,
                COUNT(DISTINCT f1.reporting_owner) AS insider_count,
                SUM(CAST(f1.transaction_shares AS REAL)) AS total_shares,
                SUM(CAST(f1.transaction_shares AS REAL) * CAST(f1.transaction_price AS REAL)) AS total_value
            FROM insider_trading f1
            JOIN insider_trading f2
                ON f1.issuer_ticker = f2.issuer_ticker
            AND f1.transaction_type = ?1
            AND f2.transaction_type = ?1
            AND ABS(julianday(f1.transaction_date) - julianday(f2.transaction_date)) <= ?2
            WHERE f1.reporting_owner_position IS NOT NULL AND f1.reporting_owner_position != ''
            AND (f1.aff10b5One IS NULL OR f1.aff10b5One = '' OR f1.aff10b5One = 'false' OR f1.aff10b5One = '0')
            GROUP BY f1.issuer_ticker, f1.transaction_date
            HAVING insider_count >= ?3
            ORDER BY insider_count
            "#,
        )
        .bind(transaction_type)
        .bind(window_days)
        .bind(min_insiders)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ClusterBuy {
                ticker: row.get("ticker"),
                transaction_date: row.get("transaction_date"),
                insider_count: row.get("insider_count"),
                total_shares: row.get("total_shares"),
                total_value: row.get("total_value"),
            })
            .collect())
    }

    /// Purchases whose share-count × price meets the dollar threshold,
    /// smallest qualifying value first.
    pub async fn large_purchases(
        &self,
        min_dollar_value: f64,
        transaction_type: &str,
    ) -> Result<Vec<LargePurchase>> {
        let rows = sqlx::query(
            r#"
            SELECT
                issuer_ticker AS ticker,
                transaction_date,
                reporting_owner,
                reporting_owner_position,
                CAST(transaction_shares AS REAL) * CAST(transaction_price AS REAL) AS dollar_value
            FROM insider_trading
            WHERE transaction_type = ?1
            AND CAST(transaction_shares AS REAL) * CAST(transaction_price AS REAL) >= ?2
            ORDER BY dollar_value ASC
            "#,
        )
        .bind(transaction_type)
        .bind(min_dollar_value)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| LargePurchase {
                ticker: row.get("ticker"),
                transaction_date: row.get("transaction_date"),
                reporting_owner: row.get("reporting_owner"),
                reporting_owner_position: row.get("reporting_owner_position"),
                dollar_value: row.get("dollar_value"),
            })
            .collect())
    }

    /// Insiders with at least `min_buys` purchases of the same issuer.
    pub async fn repeat_buyers(
        &self,
        min_buys: i64,
        transaction_type: &str,
    ) -> Result<Vec<RepeatBuyer>> {
        let rows = sqlx::query(
            r#"
            SELECT issuer_ticker AS ticker, reporting_owner, COUNT(*) AS buy_count
            FROM insider_trading
            WHERE transaction_type = ?1
            GROUP BY issuer_ticker, reporting_owner
            HAVING buy_count >= ?2
            ORDER BY buy_count ASC
            "#,
        )
        .bind(transaction_type)
        .bind(min_buys)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| RepeatBuyer {
                ticker: row.get("ticker"),
                reporting_owner: row.get("reporting_owner"),
                buy_count: row.get("buy_count"),
            })
            .collect())
    }
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> TransactionRecord {
    TransactionRecord {
        issuer_name: row.get("issuer_name"),
        issuer_ticker: row.get("issuer_ticker"),
        reporting_owner: row.get("reporting_owner"),
        reporting_owner_cik: row.get("reporting_owner_cik"),
        reporting_owner_position: row.get("reporting_owner_position"),
        transaction_date: row.get("transaction_date"),
        transaction_shares: row.get("transaction_shares"),
        transaction_price: row.get("transaction_price"),
        transaction_type: row.get("transaction_type"),
        shares_after_transaction: row.get("shares_after_transaction"),
        aff_10b5_one: row.get("aff10b5One"),
        source_file: row.get("source_file"),
    }
}
