//! Form 4 (statement of changes in beneficial ownership) extraction.
//!
//! Form 4 documents nest the same leaf tags under varying ancestor paths
//! across filing variants, so extraction is a descendant search over a single
//! event-reader pass rather than a fixed-schema deserialization. Every field
//! is independently optional; a document with nothing but a root element
//! still parses into an all-`None` result.

use crate::error::{InsiderError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Values extracted from one Form 4 document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form4Document {
    pub issuer_name: Option<String>,
    pub issuer_ticker: Option<String>,
    pub owner_name: Option<String>,
    pub owner_cik: Option<String>,
    /// Officer title, taken only from under `reportingOwnerRelationship`.
    pub officer_title: Option<String>,
    /// Top-level 10b5-1 affirmation flag; tri-state (`"true"`, `"false"`, absent).
    pub aff_10b5_one: Option<String>,
    /// The selected transaction entry, if the document reports any.
    pub transaction: Option<TransactionEntry>,
}

/// Fields of a single transaction entry, each independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEntry {
    pub date: Option<String>,
    pub shares: Option<String>,
    pub price_per_share: Option<String>,
    /// One-letter transaction code (`P` purchase, `S` sale, ...).
    pub code: Option<String>,
    pub shares_owned_after: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransactionKind {
    NonDerivative,
    Derivative,
}

impl Form4Document {
    /// Parses one raw Form 4 body.
    ///
    /// Transaction selection: the first `nonDerivativeTransaction` in the
    /// document wins; only when none exists does the first
    /// `derivativeTransaction` stand in. No aggregation across entries.
    ///
    /// # Errors
    ///
    /// `InsiderError::XmlError` when the document is not well-formed XML
    /// (reader error, no root element, or unclosed tags at end of input).
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut doc = Form4Document::default();
        let mut non_derivative: Option<TransactionEntry> = None;
        let mut derivative: Option<TransactionEntry> = None;

        let mut stack: Vec<String> = Vec::new();
        let mut saw_root = false;
        // (kind, element depth) of the transaction currently being captured
        let mut in_transaction: Option<(TransactionKind, usize)> = None;
        let mut current = TransactionEntry::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    stack.push(name);
                    saw_root = true;

                    if in_transaction.is_none() {
                        let tag = stack.last().map(String::as_str);
                        if tag == Some("nonDerivativeTransaction") && non_derivative.is_none() {
                            in_transaction = Some((TransactionKind::NonDerivative, stack.len()));
                            current = TransactionEntry::default();
                        } else if tag == Some("derivativeTransaction") && derivative.is_none() {
                            in_transaction = Some((TransactionKind::Derivative, stack.len()));
                            current = TransactionEntry::default();
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some((kind, depth)) = in_transaction {
                        if stack.len() == depth {
                            match kind {
                                TransactionKind::NonDerivative => {
                                    non_derivative = Some(current.clone());
                                }
                                TransactionKind::Derivative => {
                                    derivative = Some(current.clone());
                                }
                            }
                            in_transaction = None;
                        }
                    }
                    stack.pop();
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| InsiderError::XmlError(e.to_string()))?
                        .trim()
                        .to_string();
                    if text.is_empty() {
                        continue;
                    }
                    let tag = stack.last().map(String::as_str);
                    let parent = stack
                        .len()
                        .checked_sub(2)
                        .map(|idx| stack[idx].as_str());

                    if in_transaction.is_some() {
                        Self::capture_transaction_field(&mut current, tag, parent, text);
                    } else {
                        doc.capture_document_field(tag, parent, stack.len(), text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(InsiderError::from(e)),
            }
        }

        if !saw_root {
            return Err(InsiderError::XmlError("no root element found".to_string()));
        }
        if !stack.is_empty() {
            return Err(InsiderError::XmlError(format!(
                "unexpected end of document inside <{}>",
                stack.last().map(String::as_str).unwrap_or_default()
            )));
        }

        doc.transaction = non_derivative.or(derivative);
        Ok(doc)
    }

    fn capture_document_field(
        &mut self,
        tag: Option<&str>,
        parent: Option<&str>,
        depth: usize,
        text: String,
    ) {
        match tag {
            Some("issuerName") if self.issuer_name.is_none() => {
                self.issuer_name = Some(text);
            }
            Some("issuerTradingSymbol") if self.issuer_ticker.is_none() => {
                self.issuer_ticker = Some(text);
            }
            Some("rptOwnerName") if self.owner_name.is_none() => {
                self.owner_name = Some(text);
            }
            Some("rptOwnerCik") if self.owner_cik.is_none() => {
                self.owner_cik = Some(text);
            }
            Some("officerTitle")
                if parent == Some("reportingOwnerRelationship") && self.officer_title.is_none() =>
            {
                self.officer_title = Some(text);
            }
            // Only the flag directly under the document root counts.
            Some("aff10b5One") if depth == 2 && self.aff_10b5_one.is_none() => {
                self.aff_10b5_one = Some(text);
            }
            _ => {}
        }
    }

    fn capture_transaction_field(
        entry: &mut TransactionEntry,
        tag: Option<&str>,
        parent: Option<&str>,
        text: String,
    ) {
        match (tag, parent) {
            (Some("value"), Some("transactionDate")) if entry.date.is_none() => {
                entry.date = Some(text);
            }
            (Some("value"), Some("transactionShares")) if entry.shares.is_none() => {
                entry.shares = Some(text);
            }
            (Some("value"), Some("transactionPricePerShare"))
                if entry.price_per_share.is_none() =>
            {
                entry.price_per_share = Some(text);
            }
            (Some("value"), Some("sharesOwnedFollowingTransaction"))
                if entry.shares_owned_after.is_none() =>
            {
                entry.shares_owned_after = Some(text);
            }
            (Some("transactionCode"), _) if entry.code.is_none() => {
                entry.code = Some(text);
            }
            _ => {}
        }
    }
}
