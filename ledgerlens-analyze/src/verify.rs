//! Optional remote account verification.
//!
//! Modeled as a narrow injected capability so the engine stays testable
//! without any network dependency. The pipelines compute the inputs
//! (peer account, IFSC) per row but never invoke the verifier; callers
//! who want verification wire it up themselves. A failing call must
//! never abort statement analysis.

use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    InvalidPattern,
    SourceUnavailable,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Exists(bool),
    Error(VerifyError),
}

pub trait AccountVerifier {
    fn verify(&self, account_number: &str, ifsc_code: &str) -> VerifyOutcome;
}

/// Blocking client for the pennyless account-verification endpoint.
/// Configured from `INTEGRATION_URL` / `INTEGRATION_AUTH`; absence of
/// either simply means no verifier is available.
pub struct PennylessClient {
    base_url: String,
    auth: String,
    http: reqwest::blocking::Client,
}

impl PennylessClient {
    pub fn new(base_url: impl Into<String>, auth: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: auth.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("INTEGRATION_URL").ok()?;
        let auth = std::env::var("INTEGRATION_AUTH").ok()?;
        Some(Self::new(base_url, auth))
    }
}

/// Interpret the endpoint's response body
fn parse_verify_response(body: &Value) -> VerifyOutcome {
    if body["success"] == 1 {
        if let Some(exists) = body["result"]["data"]["account_exists"].as_bool() {
            return VerifyOutcome::Exists(exists);
        }
    }

    let message = body["result"]["message"].as_str().unwrap_or("Unknown error");
    match message {
        "Invalid IFSC pattern" => VerifyOutcome::Error(VerifyError::InvalidPattern),
        "Source Unavailable" => VerifyOutcome::Error(VerifyError::SourceUnavailable),
        other => VerifyOutcome::Error(VerifyError::Other(other.to_string())),
    }
}

impl AccountVerifier for PennylessClient {
    fn verify(&self, account_number: &str, ifsc_code: &str) -> VerifyOutcome {
        let url = format!("{}/bank/verify/account/pennyless", self.base_url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::AUTHORIZATION, &self.auth)
            .query(&[
                ("account_number", account_number),
                ("ifsc_code", ifsc_code),
                ("name", "stco"),
                ("mobile", "9999999999"),
            ])
            .send();

        let response = match response {
            Ok(r) => r,
            Err(err) => {
                warn!(error = %err, "verification request failed");
                return VerifyOutcome::Error(VerifyError::Other(err.to_string()));
            }
        };

        match response.json::<Value>() {
            Ok(body) => parse_verify_response(&body),
            Err(err) => VerifyOutcome::Error(VerifyError::Other(err.to_string())),
        }
    }
}
