//! Web Services endpoint catalog

use crate::config::join_url;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Web Services API endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// Company and financial data
    CompanyAndFinancial,
    /// Company dossiers
    CompanyDossiers,
    /// News
    News,
    /// Source catalog
    Sources,
    /// Court dockets
    Dockets,
    /// Jury verdicts and settlements
    JuryVerdictsSettlements,
}

impl Endpoint {
    /// Every endpoint
    pub const ALL: [Endpoint; 6] = [
        Endpoint::CompanyAndFinancial,
        Endpoint::CompanyDossiers,
        Endpoint::News,
        Endpoint::Sources,
        Endpoint::Dockets,
        Endpoint::JuryVerdictsSettlements,
    ];

    /// Path segment under the Web Services base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CompanyAndFinancial => "CompanyAndFinancial",
            Endpoint::CompanyDossiers => "CompanyDossiers",
            Endpoint::News => "News",
            Endpoint::Sources => "Sources",
            Endpoint::Dockets => "Dockets",
            Endpoint::JuryVerdictsSettlements => "JuryVerdictsSettlements",
        }
    }

    /// Full URL of the endpoint under `base_url`
    pub fn url(self, base_url: &str) -> String {
        join_url(base_url, self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Case-insensitive; `_`, `-` and spaces are ignored, and
    /// `JuryVerdictsAndSettlements` is accepted as an alias.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        if normalized == "juryverdictsandsettlements" {
            return Ok(Endpoint::JuryVerdictsSettlements);
        }

        Endpoint::ALL
            .into_iter()
            .find(|e| e.path().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                let known: Vec<&str> = Endpoint::ALL.iter().map(|e| e.path()).collect();
                Error::config(format!(
                    "Unknown endpoint '{s}'; expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}
