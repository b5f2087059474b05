//! Response envelope returned by the analysis pipelines

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceSummary;
use crate::error::AnalysisError;
use crate::insights::MerchantInsight;
use crate::metadata::AccountMetadata;
use crate::transaction::Transaction;

/// Numeric status classes carried in the envelope
pub mod status {
    pub const SUCCESS: u16 = 200;
    pub const BAD_REQUEST: u16 = 400;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Payload of an analysis. Field presence depends on the outcome: a
/// success carries everything, a validation failure carries whatever
/// metadata was derivable, an internal error carries only `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_info: Option<AccountMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_summary: Option<ConfidenceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_insights: Option<BTreeMap<String, MerchantInsight>>,
    /// Raw diagnostic text attached on internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: u8,
    pub status_code: u16,
    pub message: String,
    pub result: AnalysisResult,
}

impl AnalysisResponse {
    pub fn success(message: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            success: 1,
            status_code: status::SUCCESS,
            message: message.into(),
            result,
        }
    }

    /// Validation failure with an empty payload
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            success: 0,
            status_code: status::BAD_REQUEST,
            message: message.into(),
            result: AnalysisResult::default(),
        }
    }

    /// Validation failure that still carries derivable metadata and an
    /// empty transaction list
    pub fn bad_request_with_metadata(message: impl Into<String>, meta: AccountMetadata) -> Self {
        Self {
            success: 0,
            status_code: status::BAD_REQUEST,
            message: message.into(),
            result: AnalysisResult {
                account_info: Some(meta),
                transactions: Some(Vec::new()),
                ..Default::default()
            },
        }
    }

    /// Envelope for a typed analysis error. Validation failures keep
    /// their explanatory message; unexpected failures get a generic
    /// per-source message with the raw text attached as a diagnostic.
    pub fn from_error(err: AnalysisError, source_kind: &str) -> Self {
        match err {
            AnalysisError::Validation(message) => Self::bad_request(message),
            AnalysisError::Unexpected(raw) => Self::internal_error(
                format!("Failed to analyze {source_kind} bank statement"),
                raw,
            ),
        }
    }

    /// Uncaught failure: generic message outward, raw text as diagnostic
    pub fn internal_error(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            success: 0,
            status_code: status::INTERNAL_SERVER_ERROR,
            message: message.into(),
            result: AnalysisResult {
                error: Some(raw.into()),
                ..Default::default()
            },
        }
    }
}
