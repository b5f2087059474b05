//! Account-level metadata pulled from statement header text

use serde::{Deserialize, Serialize};

/// Date coverage of a statement.
///
/// Serializes as `{from, to}`, `{date}` or `{}` depending on how many
/// distinct dates the source yielded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatementPeriod {
    Range { from: String, to: String },
    Single { date: String },
    Empty {},
}

impl Default for StatementPeriod {
    fn default() -> Self {
        StatementPeriod::Empty {}
    }
}

impl StatementPeriod {
    pub fn is_empty(&self) -> bool {
        matches!(self, StatementPeriod::Empty {})
    }
}

/// Account/bank/contact fields extracted from header text or a
/// document-wide text blob. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountMetadata {
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub bank_name: Option<String>,
    pub branch: Option<String>,
    pub ifsc_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub statement_period: StatementPeriod,
}
