use crate::summary::SummaryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The record returned by the structured-extraction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Primary report, markdown with `## ` section headings
    pub report: String,

    /// Link to the source document
    #[serde(rename = "docLink")]
    pub doc_link: String,

    #[serde(rename = "metadata_title")]
    pub title: String,

    #[serde(rename = "metadata_description")]
    pub description: String,

    pub signer: String,

    /// Signing date as written, e.g. "January 19, 2025"
    #[serde(rename = "dateSigned")]
    pub date_signed: String,

    #[serde(rename = "executiveOrderNumber", default)]
    pub order_number: Option<f64>,
}

impl DocumentSummary {
    /// Parses a service response
    ///
    /// Malformed JSON and missing required fields are both parse failures.
    pub fn from_json(text: &str) -> Result<Self, SummaryError> {
        serde_json::from_str(text).map_err(|e| SummaryError::Parse(e.to_string()))
    }

    /// Sequence number, when the service returned a whole non-negative number
    pub fn order_number(&self) -> Option<i64> {
        self.order_number
            .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as i64)
    }

    /// Parsed signing date
    pub fn signing_date(&self) -> Option<NaiveDate> {
        parse_signing_date(&self.date_signed)
    }
}

/// Parses dates such as "January 19, 2025" or "Jan 19, 2025"
pub fn parse_signing_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%b %d, %Y"))
        .ok()
}
