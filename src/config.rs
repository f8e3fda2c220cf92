//! Company configuration stamped into statutory reports

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{RetailError, RetailResult};

/// Static company metadata for GSTR filings
///
/// Configured once per installation, never derived from transaction data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Registered legal name of the business
    pub legal_name: String,
    /// Trade name, if different from the legal name
    pub trade_name: Option<String>,
    /// The business's own GST registration number
    pub gstin: String,
    pub address: Option<String>,
}

impl CompanyProfile {
    pub fn new(legal_name: String, gstin: String) -> Self {
        Self {
            legal_name,
            trade_name: None,
            gstin,
            address: None,
        }
    }

    /// State code from the GSTIN prefix, "00" when unavailable
    pub fn state_code(&self) -> String {
        let code: String = self.gstin.chars().take(2).collect();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_digit()) {
            code
        } else {
            "00".to_string()
        }
    }

    /// Parse a profile from a JSON string
    pub fn from_json_str(json: &str) -> RetailResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| RetailError::Config(format!("invalid company profile: {}", e)))
    }

    /// Load a profile from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RetailResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RetailError::Config(format!(
                "cannot read company profile {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }
}
