//! Transaction record types produced by statement analysis

use serde::{Deserialize, Serialize};

/// Direction of a transaction. The amount itself is always a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "CREDIT")]
    Credit,
    #[serde(rename = "DEBIT")]
    Debit,
}

/// Payment rail resolved from the narration, most-specific tags first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "IMPS")]
    Imps,
    #[serde(rename = "NEFT")]
    Neft,
    #[serde(rename = "RTGS")]
    Rtgs,
    #[serde(rename = "BBPS")]
    Bbps,
    #[serde(rename = "CARD")]
    Card,
    #[serde(rename = "CASH")]
    Cash,
    #[serde(rename = "CHEQUE")]
    Cheque,
    #[serde(rename = "DIVIDEND")]
    Dividend,
    #[serde(rename = "INTEREST")]
    Interest,
    #[serde(rename = "ECS")]
    Ecs,
    #[serde(rename = "SALARY")]
    Salary,
    #[serde(rename = "BILL PAY")]
    BillPay,
    #[serde(rename = "ATM")]
    Atm,
}

/// Counterparty identity extracted from the narration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiverDetails {
    pub name: Option<String>,
    pub account: Option<String>,
    pub vpa: Option<String>,
}

impl ReceiverDetails {
    /// True when no identity field was extracted
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.account.is_none() && self.vpa.is_none()
    }
}

/// Structured facets decomposed from a free-text narration.
///
/// All fields optional: an empty narration yields the default (all-null)
/// facets. `category` is a deduplicated union; `remarks` preserves the
/// order in which tags were appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrationFacets {
    pub payment_method: Option<PaymentMethod>,
    pub upi_id: Option<String>,
    pub transaction_reference: Option<String>,
    pub receiver_details: ReceiverDetails,
    pub bank_peer: Option<String>,
    pub merchant: Option<String>,
    pub category: Vec<String>,
    pub remarks: Vec<String>,
    pub payment_gateway: Option<String>,
}

/// One fully-assembled statement transaction.
///
/// `transaction_date` holds the canonical `YYYY-MM-DD` form when the source
/// date parsed, or the original string verbatim when it did not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_date: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub narration: String,
    pub balance: Option<f64>,
    pub account: Option<String>,
    #[serde(flatten)]
    pub facets: NarrationFacets,
    pub confidence_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serializes_flat() {
        let txn = Transaction {
            transaction_date: Some("2025-02-04".to_string()),
            transaction_type: Some(TransactionType::Debit),
            amount: Some(450.0),
            narration: "UPI PAYMENT".to_string(),
            balance: Some(1200.5),
            account: None,
            facets: NarrationFacets {
                payment_method: Some(PaymentMethod::Upi),
                ..Default::default()
            },
            confidence_score: 0.9,
        };

        let json = serde_json::to_value(&txn).unwrap();
        // Facets flatten into the transaction object on the wire
        assert_eq!(json["payment_method"], "UPI");
        assert_eq!(json["transaction_type"], "DEBIT");
        assert_eq!(json["receiver_details"]["name"], serde_json::Value::Null);
        assert_eq!(json["confidence_score"], 0.9);
    }

    #[test]
    fn test_receiver_is_empty() {
        assert!(ReceiverDetails::default().is_empty());
        let r = ReceiverDetails {
            vpa: Some("john@bank".to_string()),
            ..Default::default()
        };
        assert!(!r.is_empty());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BillPay).unwrap(),
            "\"BILL PAY\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"UPI\"");
    }
}
