//! Document parsers.

pub mod form4;

pub use form4::{Form4Document, TransactionEntry};
