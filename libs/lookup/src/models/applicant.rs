use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of applicant enrolling, used to filter provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicantType {
    Individual,
    Organization,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("applicant type must be INDIVIDUAL or ORGANIZATION")]
pub struct ParseApplicantTypeError;

impl ApplicantType {
    /// Value of the `applicant_type` flag on provider type rows
    pub fn flag(self) -> i32 {
        match self {
            ApplicantType::Individual => 0,
            ApplicantType::Organization => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicantType::Individual => "INDIVIDUAL",
            ApplicantType::Organization => "ORGANIZATION",
        }
    }
}

impl FromStr for ApplicantType {
    type Err = ParseApplicantTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INDIVIDUAL" => Ok(Self::Individual),
            "ORGANIZATION" => Ok(Self::Organization),
            _ => Err(ParseApplicantTypeError),
        }
    }
}

impl std::fmt::Display for ApplicantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
