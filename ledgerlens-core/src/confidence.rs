//! Deterministic completeness scoring for assembled transactions

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Scores at or above this count as high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Round to 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Additive-penalty completeness score, clamped to [0, 1].
///
/// Starts at 1.0 and subtracts a fixed penalty per missing/weak field.
/// A date that failed parsing but was kept verbatim still counts as
/// present; only a truly absent date is penalized.
pub fn score_transaction(txn: &Transaction) -> f64 {
    let mut score: f64 = 1.0;

    if txn.transaction_date.is_none() {
        score -= 0.25;
    }

    match txn.amount {
        Some(amount) if amount > 0.0 => {}
        _ => score -= 0.25,
    }

    if txn.narration.is_empty() {
        score -= 0.15;
    } else if txn.narration.trim().len() < 5 {
        score -= 0.05; // weak/short narration
    }

    if txn.transaction_type.is_none() {
        score -= 0.10;
    }

    if txn.facets.receiver_details.is_empty() {
        score -= 0.10;
    }

    if txn.balance.is_none() {
        score -= 0.05;
    }

    round2(score).clamp(0.0, 1.0)
}

/// Document-level confidence rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSummary {
    pub overall_score: f64,
    pub total_transactions: usize,
    pub high_confidence_txns: usize,
}

/// Mean of per-transaction scores (0.0 when empty) plus the count of
/// high-confidence transactions.
pub fn summarize(transactions: &[Transaction]) -> ConfidenceSummary {
    let total = transactions.len();
    let overall = if total == 0 {
        0.0
    } else {
        round2(transactions.iter().map(|t| t.confidence_score).sum::<f64>() / total as f64)
    };
    let high = transactions
        .iter()
        .filter(|t| t.confidence_score >= HIGH_CONFIDENCE_THRESHOLD)
        .count();

    ConfidenceSummary {
        overall_score: overall,
        total_transactions: total,
        high_confidence_txns: high,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{NarrationFacets, ReceiverDetails, TransactionType};

    fn complete_txn() -> Transaction {
        Transaction {
            transaction_date: Some("2025-02-04".to_string()),
            transaction_type: Some(TransactionType::Debit),
            amount: Some(450.0),
            narration: "UPI PAYMENT TO GROCER".to_string(),
            balance: Some(10_000.0),
            account: None,
            facets: NarrationFacets {
                receiver_details: ReceiverDetails {
                    account: Some("123456789012".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
            confidence_score: 0.0,
        }
    }

    #[test]
    fn test_complete_transaction_scores_one() {
        assert_eq!(score_transaction(&complete_txn()), 1.0);
    }

    #[test]
    fn test_missing_balance_scores_095() {
        let mut txn = complete_txn();
        txn.balance = None;
        assert_eq!(score_transaction(&txn), 0.95);
    }

    #[test]
    fn test_unparsed_date_string_not_penalized() {
        let mut txn = complete_txn();
        txn.transaction_date = Some("??/??/????".to_string());
        assert_eq!(score_transaction(&txn), 1.0);
    }

    #[test]
    fn test_everything_missing_floors_at_zero() {
        let txn = Transaction {
            transaction_date: None,
            transaction_type: None,
            amount: None,
            narration: String::new(),
            balance: None,
            account: None,
            facets: NarrationFacets::default(),
            confidence_score: 0.0,
        };
        // 1.0 - 0.25 - 0.25 - 0.15 - 0.10 - 0.10 - 0.05 = 0.10
        assert_eq!(score_transaction(&txn), 0.10);
    }

    #[test]
    fn test_short_narration_penalty() {
        let mut txn = complete_txn();
        txn.narration = "ATM".to_string();
        assert_eq!(score_transaction(&txn), 0.95);
    }

    #[test]
    fn test_summary_counts() {
        let mut low = complete_txn();
        low.balance = None;
        low.transaction_type = None;
        low.confidence_score = score_transaction(&low); // 0.85

        let mut full = complete_txn();
        full.confidence_score = score_transaction(&full); // 1.0

        let summary = summarize(&[full, low]);
        assert_eq!(summary.total_transactions, 2);
        assert_eq!(summary.high_confidence_txns, 2); // 0.85 still counts
        assert_eq!(summary.overall_score, 0.93); // (1.0 + 0.85) / 2 = 0.925 -> 0.93
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.overall_score, 0.0);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.high_confidence_txns, 0);
    }
}
