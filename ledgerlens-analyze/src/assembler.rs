//! Per-row transaction assembly.
//!
//! Every row resolves to an explicit outcome: an assembled transaction or
//! a skip with a reason. Skips are counted by the pipeline and never abort
//! the source.

use tracing::debug;

use ledgerlens_core::{Transaction, TransactionType};
use ledgerlens_ingest::schema::ColumnRoles;
use ledgerlens_ingest::types::RawRecord;
use ledgerlens_ingest::{normalize_date, parse_amount};

use crate::narration::classify_narration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Credit, debit and general amount cells all failed to parse
    NoAmount,
    /// No amount resolved and the narration is empty too
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Assembled(Transaction),
    Skipped(SkipReason),
}

/// Assemble one raw row into a transaction.
///
/// Amount/type resolution: a positive credit wins, then a positive debit,
/// then the general amount column (type by sign, magnitude stored).
/// Confidence is attached later by the pipeline, after all rows exist.
pub fn assemble_row(record: &RawRecord, roles: &ColumnRoles) -> RowOutcome {
    let credit = record.get_role(roles.credit.as_ref()).and_then(parse_amount);
    let debit = record.get_role(roles.debit.as_ref()).and_then(parse_amount);
    let general = record.get_role(roles.amount.as_ref()).and_then(parse_amount);

    let (amount, txn_type) = match (credit, debit, general) {
        (Some(c), _, _) if c > 0.0 => (Some(c), Some(TransactionType::Credit)),
        (_, Some(d), _) if d > 0.0 => (Some(d), Some(TransactionType::Debit)),
        (_, _, Some(g)) => {
            let direction = if g >= 0.0 {
                TransactionType::Credit
            } else {
                TransactionType::Debit
            };
            (Some(g.abs()), Some(direction))
        }
        _ => (None, None),
    };

    if credit.is_none() && debit.is_none() && general.is_none() {
        return RowOutcome::Skipped(SkipReason::NoAmount);
    }

    let narration = record
        .get_role(roles.narration.as_ref())
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    if narration.is_empty() && amount.is_none() {
        return RowOutcome::Skipped(SkipReason::Empty);
    }

    let transaction_date = record
        .get_role(roles.date.as_ref())
        .and_then(normalize_date);

    let balance = record
        .get_role(roles.balance.as_ref())
        .and_then(parse_amount);

    let account = record
        .get_role(roles.account.as_ref())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    let facets = classify_narration(&narration);

    // Verification inputs are computed per row for the injected verifier,
    // which the pipeline never actually invokes
    debug!(
        peer_account = facets.receiver_details.account.as_deref(),
        peer_ifsc = facets.bank_peer.as_deref(),
        "verification candidates"
    );

    RowOutcome::Assembled(Transaction {
        transaction_date,
        transaction_type: txn_type,
        amount,
        narration,
        balance,
        account,
        facets,
        confidence_score: 0.0,
    })
}
