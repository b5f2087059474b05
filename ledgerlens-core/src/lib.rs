//! ledgerlens-core: Domain types and pure computations for statement analysis

pub mod confidence;
pub mod dates;
pub mod error;
pub mod insights;
pub mod metadata;
pub mod response;
pub mod transaction;

pub use confidence::{ConfidenceSummary, HIGH_CONFIDENCE_THRESHOLD, round2, score_transaction, summarize};
pub use error::AnalysisError;
pub use insights::{MerchantInsight, aggregate_merchants};
pub use metadata::{AccountMetadata, StatementPeriod};
pub use response::{AnalysisResponse, AnalysisResult, status};
pub use transaction::{NarrationFacets, PaymentMethod, ReceiverDetails, Transaction, TransactionType};
