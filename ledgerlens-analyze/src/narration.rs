//! Narration classification: decompose a free-text transaction
//! description into structured payment facets.
//!
//! Structured, machine-generated narrations (slash-delimited UPI/VSI/IMPS
//! forms) are unambiguous and short-circuit everything else. Only when no
//! cascade fires do the generic keyword passes run, each field
//! independently. Keyword tables are ordered most-specific-first and the
//! table order is the tie-break; do not reorder them.

use once_cell::sync::Lazy;
use regex::Regex;

use ledgerlens_core::{NarrationFacets, PaymentMethod};

static UPI_STRUCTURED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UPI/(?P<upi_id>[^/]+)/(?P<remark>[^/]+)/(?P<bank>[^/]+)/(?P<txn_id>[^\s/]+)")
        .unwrap()
});

static VSI_STRUCTURED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"VSI/(?P<merchant>[^/]+)/(?P<datetime>[^/]+)/(?P<txn_id>[^\s/]+)").unwrap()
});

static IMPS_TRANSFER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"IMPS/(\d{10,})/([^/]+)/([^/]+)").unwrap());

/// Email-shaped token doubling as a UPI VPA
static VPA_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[a-z0-9.\-_]+@[a-z]{2,}").unwrap());

/// Transaction-reference extractors, most specific first. Group 1 when
/// present, whole match otherwise.
static TXN_REF_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b(?:RRN|REF|TRF|TXN|UTR|UTR NO|NFS|CMS|ID)\s*[:.]?\s*([A-Z0-9]{10,25})\b")
            .unwrap(),
        Regex::new(r"\b(YBL|AXI|ICI|KOT|PNB|PYTM|PTM|HDFC|ICICI|YES|SBI)[a-zA-Z0-9]{6,25}\b")
            .unwrap(),
        Regex::new(r"\b(?:\d{10,})\b").unwrap(),
    ]
});

/// Counterparty relation patterns, first match wins
static RECEIVER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:TO|FROM|BY)\s+([A-Z0-9\s.&,-_']{3,}(?:\s(?:A/C|ACC|AC|ACCOUNT|NO)\s*\d+)?)\b")
            .unwrap(),
        Regex::new(r"(?:TRANSFER TO|PAYMENT TO)\s+([A-Z\s.&,-_']{3,})").unwrap(),
        Regex::new(r"CR BY\s+([A-Z\s.&,-_']{3,})").unwrap(),
    ]
});

static DIGIT_RUN_6: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{6,}").unwrap());
static LETTER_RUN_3: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{3,}").unwrap());

/// Payment-rail keyword groups; table order is the tie-break
const PAYMENT_METHOD_KEYWORDS: &[(PaymentMethod, &[&str])] = &[
    (PaymentMethod::Upi, &["UPI", "IMPS/P2M", "PHONEPE", "GPAY", "PAYTM"]),
    (PaymentMethod::Imps, &["IMPS", "IMPS/P2A"]),
    (PaymentMethod::Neft, &["NEFT"]),
    (PaymentMethod::Rtgs, &["RTGS"]),
    (PaymentMethod::Bbps, &["BBPS"]),
    (
        PaymentMethod::Card,
        &["CARD", "DEBIT CARD", "CREDIT CARD", "POS", "VPA/MMT", "VPA/MMS"],
    ),
    (PaymentMethod::Cash, &["CASH DEP", "CASH WDL"]),
    (PaymentMethod::Cheque, &["CHQ", "CHEQUE", "CQ", "CLR"]),
    (PaymentMethod::Dividend, &["DIVIDEND", "DIV"]),
    (PaymentMethod::Interest, &["INT PAID", "INT CR"]),
    (PaymentMethod::Ecs, &["ECS"]),
    (PaymentMethod::Salary, &["SALARY"]),
    (PaymentMethod::BillPay, &["BILLPAY"]),
    (PaymentMethod::Atm, &["ATM"]),
];

/// Bank names and abbreviations, full names before abbreviations
const BANK_KEYWORDS: &[&str] = &[
    "STATE BANK OF INDIA",
    "HDFC BANK",
    "ICICI BANK",
    "AXIS BANK",
    "YES BANK",
    "KOTAK MAHINDRA BANK",
    "PUNJAB NATIONAL BANK",
    "UNION BANK OF INDIA",
    "CANARA BANK",
    "INDIAN BANK",
    "INDUSIND BANK",
    "FEDERAL BANK",
    "RBL BANK",
    "BANDHAN BANK",
    "IDFC FIRST BANK",
    "BANK OF BARODA",
    "UCO BANK",
    "CENTRAL BANK OF INDIA",
    "SBI",
    "HDFC",
    "ICICI",
    "AXIS",
    "KOTAK",
    "PNB",
    "UNION",
    "CANARA",
    "INDUSIND",
    "BOB",
    "UBI",
    "IOB",
    "BOI",
    "CORP",
];

struct MerchantRule {
    keyword: &'static str,
    merchant: Option<&'static str>,
    category: &'static str,
    payment_gateway: Option<&'static str>,
}

const fn rule(
    keyword: &'static str,
    merchant: Option<&'static str>,
    category: &'static str,
    payment_gateway: Option<&'static str>,
) -> MerchantRule {
    MerchantRule {
        keyword,
        merchant,
        category,
        payment_gateway,
    }
}

/// Merchant/category table. Every matching keyword unions its category;
/// merchant and payment_gateway are set only by the first match.
const MERCHANT_RULES: &[MerchantRule] = &[
    rule("AMAZON", Some("AMAZON"), "E-COMMERCE", None),
    rule("ZOMATO", Some("ZOMATO"), "FOOD_DELIVERY", None),
    rule("SWIGGY", Some("SWIGGY"), "FOOD_DELIVERY", None),
    rule("GOOGLE PAY", Some("GOOGLE PAY"), "PAYMENT_APP", Some("GOOGLE")),
    rule("PHONEPE", Some("PHONEPE"), "PAYMENT_APP", Some("PHONEPE")),
    rule("PAYTM", Some("PAYTM"), "PAYMENT_APP", Some("PAYTM")),
    rule("RELIANCE", Some("RELIANCE"), "RETAIL", None),
    rule("VODAFONE", Some("VODAFONE"), "TELECOM_BILL", None),
    rule("AIRTEL", Some("AIRTEL"), "TELECOM_BILL", None),
    rule("JIO", Some("JIO"), "TELECOM_BILL", None),
    rule("IRCTC", Some("IRCTC"), "TRAVEL", None),
    rule("UBER", Some("UBER"), "TRANSPORT", None),
    rule("OLA", Some("OLA"), "TRANSPORT", None),
    rule("NETFLIX", Some("NETFLIX"), "SUBSCRIPTION", None),
    rule("SPOTIFY", Some("SPOTIFY"), "SUBSCRIPTION", None),
    rule("CRED", Some("CRED"), "LOAN_REPAYMENT", Some("CRED")),
    rule("ELECTRICITY", None, "UTILITY_BILL", None),
    rule("WATER", None, "UTILITY_BILL", None),
    rule("GAS", None, "UTILITY_BILL", None),
    rule("LOAN EMI", None, "LOAN_REPAYMENT", None),
    rule("RENT", None, "HOUSING", None),
    rule("SALARY", None, "INCOME", None),
    rule("SCHOOL FEES", None, "EDUCATION", None),
    rule("INSURANCE", None, "INSURANCE", None),
    rule("INVESTMENT", None, "INVESTMENT", None),
    rule("SIP", None, "INVESTMENT", None),
    rule("MUTUAL FUND", None, "INVESTMENT", None),
    rule("FOOD", None, "FOOD_EXPENSE", None),
    rule("MEDICAL", None, "HEALTH_EXPENSE", None),
    rule("PHARMACY", None, "HEALTH_EXPENSE", None),
    rule("CHEMIST", None, "HEALTH_EXPENSE", None),
    rule("ECOM", None, "E-COMMERCE", None),
    rule("GROCERY", None, "GROCERIES", None),
    rule("FUEL", None, "TRANSPORT_FUEL", None),
    rule("TAX", None, "TAXES", None),
    rule("LOAN DISB", None, "LOAN_DISBURSEMENT", None),
];

/// Remark tags appended independently when the substring is present
const REMARK_TAGS: &[&str] = &["REFUND", "TRANSFER", "DEBITED", "CREDITED"];

/// Grouped-digit account shapes with separators collapsed
static ACCOUNT_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[\s\-]?\d{4}[\s\-]?\d{4,12}\b").unwrap());
static ACCOUNT_LONG_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{8,20}\b").unwrap());
static ACCOUNT_UPI_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:UPI|REF|TXN)[\s\-:]*(\d{8,16})").unwrap());
static ACCOUNT_TRANSFER_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:NEFT|RTGS|IMPS)[\s\-:]*[A-Z]*(\d{8,16})").unwrap());

/// Union of candidate account/reference numbers in the narration,
/// longest first (ties broken by string order for determinism)
pub fn extract_possible_account_numbers(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }

    let mut numbers: Vec<String> = Vec::new();
    let mut push_unique = |n: String| {
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    };

    for m in ACCOUNT_GROUPED.find_iter(description) {
        push_unique(m.as_str().replace([' ', '-'], ""));
    }
    for m in ACCOUNT_LONG_RUN.find_iter(description) {
        push_unique(m.as_str().to_string());
    }
    for caps in ACCOUNT_UPI_REF.captures_iter(description) {
        push_unique(caps[1].to_string());
    }
    for caps in ACCOUNT_TRANSFER_REF.captures_iter(description) {
        push_unique(caps[1].to_string());
    }

    numbers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    numbers
}

/// Decompose a narration into structured payment facets.
///
/// Matching is case-insensitive: the narration is uppercased once and all
/// cascades and tables run against that form.
pub fn classify_narration(narration: &str) -> NarrationFacets {
    let mut facets = NarrationFacets::default();
    if narration.is_empty() {
        return facets;
    }

    let upper = narration.to_uppercase();

    // Structured cascades: first match answers everything it knows and
    // stops; generic rules must not re-interpret machine narrations.
    if let Some(caps) = UPI_STRUCTURED.captures(&upper) {
        facets.payment_method = Some(PaymentMethod::Upi);
        facets.upi_id = Some(caps["upi_id"].trim().to_string());
        facets.transaction_reference = Some(caps["txn_id"].trim().to_string());
        facets.bank_peer = Some(caps["bank"].trim().to_string());
        facets.remarks.push(caps["remark"].trim().to_string());
        return facets;
    }

    if let Some(caps) = VSI_STRUCTURED.captures(&upper) {
        facets.payment_method = Some(PaymentMethod::Card);
        facets.merchant = Some(caps["merchant"].trim().to_string());
        facets.transaction_reference = Some(caps["txn_id"].trim().to_string());
        return facets;
    }

    if let Some(caps) = IMPS_TRANSFER.captures(&upper) {
        facets.payment_method = Some(PaymentMethod::Imps);
        facets.transaction_reference = Some(caps[1].trim().to_string());
        facets.receiver_details.name = Some(caps[2].trim().to_string());
        facets.bank_peer = Some(caps[3].trim().to_string());
        facets.remarks.push("IMPS TRANSFER".to_string());
        return facets;
    }

    // Generic passes, each field independent of the others

    for (method, keywords) in PAYMENT_METHOD_KEYWORDS {
        if keywords.iter().any(|kw| upper.contains(kw)) {
            facets.payment_method = Some(*method);
            break;
        }
    }

    if facets.upi_id.is_none() {
        if let Some(m) = VPA_SHAPE.find(&upper) {
            let vpa = m.as_str().trim().to_string();
            facets.upi_id = Some(vpa.clone());
            facets.receiver_details.vpa = Some(vpa);
        }
    }

    if facets.transaction_reference.is_none() {
        for pattern in TXN_REF_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&upper) {
                let text = caps.get(1).unwrap_or_else(|| caps.get(0).unwrap());
                facets.transaction_reference = Some(text.as_str().trim().to_string());
                break;
            }
        }
    }

    for pattern in RECEIVER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&upper) {
            let candidate = caps[1].trim().to_string();
            // Numeric-looking text is an account, anything wordy a name
            if DIGIT_RUN_6.is_match(&candidate) && !LETTER_RUN_3.is_match(&candidate) {
                facets.receiver_details.account = Some(candidate);
            } else {
                facets.receiver_details.name = Some(candidate);
            }
            break;
        }
    }

    for bank in BANK_KEYWORDS {
        if upper.contains(bank) {
            facets.bank_peer = Some((*bank).to_string());
            break;
        }
    }

    for rule in MERCHANT_RULES {
        if upper.contains(rule.keyword) {
            if let Some(merchant) = rule.merchant {
                facets.merchant.get_or_insert_with(|| merchant.to_string());
            }
            if !facets.category.iter().any(|c| c == rule.category) {
                facets.category.push(rule.category.to_string());
            }
            if let Some(gateway) = rule.payment_gateway {
                facets
                    .payment_gateway
                    .get_or_insert_with(|| gateway.to_string());
            }
        }
    }

    for tag in REMARK_TAGS {
        if upper.contains(tag) && !facets.remarks.iter().any(|r| r == tag) {
            facets.remarks.push((*tag).to_string());
        }
    }

    // Longest numeric candidate wins the fallback account slot, replacing
    // whatever the relation patterns produced
    let possible_accounts = extract_possible_account_numbers(&upper);
    if let Some(longest) = possible_accounts.into_iter().next() {
        facets.receiver_details.account = Some(longest);
    }

    facets
}
