//! Merchant-level statistics over a finished transaction sequence

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::confidence::round2;
use crate::dates;
use crate::transaction::Transaction;

/// Per-counterparty statistics derived from the full transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantInsight {
    pub count: usize,
    pub avg_amount: Option<f64>,
    pub median_amount: Option<f64>,
    pub std_amount: Option<f64>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    /// Day-of-month values seen more than once, sorted ascending
    pub common_days: Vec<u32>,
}

/// Resolved counterparty identity: merchant, then receiver name, then
/// receiver account, then the literal "UNKNOWN".
fn group_key(txn: &Transaction) -> String {
    txn.facets
        .merchant
        .clone()
        .or_else(|| txn.facets.receiver_details.name.clone())
        .or_else(|| txn.facets.receiver_details.account.clone())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

fn parse_txn_date(raw: &str) -> Option<NaiveDate> {
    dates::parse_canonical(raw).or_else(|| dates::parse_permissive(raw, false))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation; None below 2 values
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Group transactions by resolved counterparty and compute per-group
/// statistics. Grouping is order-insensitive; the input sequence is not
/// modified or reordered.
pub fn aggregate_merchants(transactions: &[Transaction]) -> BTreeMap<String, MerchantInsight> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        groups.entry(group_key(txn)).or_default().push(txn);
    }

    let mut insights = BTreeMap::new();
    for (identity, txns) in groups {
        let amounts: Vec<f64> = txns.iter().filter_map(|t| t.amount).collect();
        let parsed_dates: Vec<NaiveDate> = txns
            .iter()
            .filter_map(|t| t.transaction_date.as_deref())
            .filter_map(parse_txn_date)
            .collect();

        let avg = if amounts.is_empty() {
            None
        } else {
            Some(round2(amounts.iter().sum::<f64>() / amounts.len() as f64))
        };
        let med = if amounts.is_empty() {
            None
        } else {
            Some(round2(median(&amounts)))
        };
        let std = sample_std(&amounts).map(round2);

        let first = parsed_dates.iter().min().copied().map(dates::to_canonical);
        let last = parsed_dates.iter().max().copied().map(dates::to_canonical);

        let days: Vec<u32> = parsed_dates.iter().map(|d| d.day()).collect();
        let mut common_days: Vec<u32> = days
            .iter()
            .filter(|d| days.iter().filter(|x| x == d).count() > 1)
            .copied()
            .collect();
        common_days.sort_unstable();
        common_days.dedup();

        debug!(identity = %identity, count = txns.len(), "aggregated merchant group");

        insights.insert(
            identity,
            MerchantInsight {
                count: txns.len(),
                avg_amount: avg,
                median_amount: med,
                std_amount: std,
                first_seen: first,
                last_seen: last,
                common_days,
            },
        );
    }

    insights
}
