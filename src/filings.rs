//! Submissions metadata and filing URL construction.
//!
//! The submissions endpoint returns a company's filing history in columnar
//! form: parallel arrays of accession numbers, form types, report dates and
//! primary documents. This module models that envelope, zips the columns into
//! per-filing values, and builds the archive URLs the fetcher downloads.

use super::Edgar;
use super::error::Result;
use super::options::FilingOptions;
use super::traits::FilingOperations;
use async_trait::async_trait;
use serde::Deserialize;

/// Envelope of the submissions endpoint.
///
/// Only the fields the pipeline reads are modeled; serde ignores the rest of
/// the payload (addresses, former names, SIC metadata and so on).
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub cik: String,
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// Columnar arrays of a company's most recent filings.
///
/// All arrays run in parallel; index `i` across them describes one filing.
/// Some columns are missing entirely for older companies, hence the options.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentFilings {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    pub filing_date: Vec<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<Vec<String>>,
    pub form: Vec<String>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Option<Vec<String>>,
}

/// One filing zipped out of the columnar arrays.
#[derive(Debug, Clone)]
pub struct DetailedFiling {
    pub accession_number: String,
    pub filing_date: String,
    pub report_date: Option<String>,
    pub form: String,
    pub primary_document: Option<String>,
}

impl RecentFilings {
    fn get_vec_item_at<T: Clone>(&self, vec_opt: &Option<Vec<T>>, idx: usize) -> Option<T> {
        vec_opt.as_ref().and_then(|v| v.get(idx).cloned())
    }

    /// Zips column index `idx` into a `DetailedFiling`, or `None` past the end.
    pub fn detailed(&self, idx: usize) -> Option<DetailedFiling> {
        Some(DetailedFiling {
            accession_number: self.accession_number.get(idx)?.clone(),
            filing_date: self.filing_date.get(idx)?.clone(),
            report_date: self.get_vec_item_at(&self.report_date, idx),
            form: self.form.get(idx)?.clone(),
            primary_document: self.get_vec_item_at(&self.primary_document, idx),
        })
    }

    pub fn len(&self) -> usize {
        self.accession_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accession_number.is_empty()
    }
}

#[derive(Debug)]
enum UrlType {
    Submission,
    FilingContent,
}

impl Edgar {
    fn build_filing_url(&self, url_type: UrlType, params: &[&str]) -> String {
        match url_type {
            UrlType::Submission => {
                let cik = format!("{:0>10}", params[0]);
                format!("{}/submissions/CIK{}.json", self.edgar_data_url, cik)
            }
            UrlType::FilingContent => {
                let (cik, acc_no, filename) = (params[0], params[1], params[2]);
                let formatted_acc = acc_no.replace("-", "");
                format!(
                    "{}/data/{}/{}/{}",
                    self.edgar_archives_url, cik, formatted_acc, filename
                )
            }
        }
    }
}

#[async_trait]
impl FilingOperations for Edgar {
    /// Retrieves submission history for a given CIK.
    ///
    /// The CIK is zero-padded to ten digits as the endpoint requires.
    ///
    /// # Errors
    ///
    /// * `InsiderError::NotFound` - no submissions exist for the CIK
    /// * `InsiderError::JsonError` - the response is malformed
    /// * network errors from the underlying request
    async fn submissions(&self, cik: &str) -> Result<Submission> {
        let url = self.build_filing_url(UrlType::Submission, &[cik]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<Submission>(&response)?)
    }

    /// Retrieves recent filings for a given CIK as a flat Vec.
    async fn get_recent_filings(&self, cik: &str) -> Result<Vec<DetailedFiling>> {
        let submission = self.submissions(cik).await?;
        let recent = &submission.filings.recent;

        Ok((0..recent.len()).filter_map(|idx| recent.detailed(idx)).collect())
    }

    /// Retrieves recent filings filtered by form type, offset and limit.
    ///
    /// Form types are matched exactly against the trimmed `form` column, so
    /// requesting `"4"` does not pull in `"4/A"` amendments.
    async fn filings(&self, cik: &str, opts: Option<FilingOptions>) -> Result<Vec<DetailedFiling>> {
        let mut all_filings = self.get_recent_filings(cik).await?;

        if let Some(opts) = opts {
            if let Some(ref form_types) = opts.form_types {
                all_filings.retain(|filing| form_types.iter().any(|ft| ft == filing.form.trim()));
            }

            if let Some(offset) = opts.offset {
                all_filings = all_filings.into_iter().skip(offset).collect();
            }

            if let Some(limit) = opts.limit {
                all_filings.truncate(limit);
            }
        }

        Ok(all_filings)
    }

    /// Constructs the archive URL of a filing's primary document.
    ///
    /// Format: `{archives}/data/{cik}/{accession-without-dashes}/{document}`.
    fn primary_document_url(&self, cik: &str, accession_number: &str, document: &str) -> String {
        self.build_filing_url(UrlType::FilingContent, &[cik, accession_number, document])
    }
}
