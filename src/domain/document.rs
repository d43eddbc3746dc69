//! Document type
//!
//! Domain primitive for the national taxpayer document (CPF) that identifies
//! an account holder. Parsing normalizes the formatted representation and
//! verifies both check digits, so an invalid document cannot exist in the
//! system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a CPF.
const CPF_LEN: usize = 11;

/// A validated, normalized CPF (digits only, no punctuation).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Document(String);

/// Errors that can occur when parsing a Document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document must have {CPF_LEN} digits (got {0})")]
    InvalidLength(usize),

    #[error("Document must not have all digits equal")]
    RepeatedDigits,

    #[error("Document contains a non-numeric character")]
    NotNumeric,

    #[error("Document check digits do not match")]
    InvalidCheckDigits,
}

impl Document {
    /// Parse a CPF, accepting the formatted ("529.982.247-25") and bare
    /// ("52998224725") representations.
    pub fn parse(input: &str) -> Result<Self, DocumentError> {
        let normalized: String = input.chars().filter(|c| *c != '.' && *c != '-').collect();

        if normalized.len() != CPF_LEN {
            return Err(DocumentError::InvalidLength(normalized.len()));
        }

        let digits: Vec<u32> = normalized
            .chars()
            .map(|c| c.to_digit(10).ok_or(DocumentError::NotNumeric))
            .collect::<Result<_, _>>()?;

        if digits.iter().all(|d| *d == digits[0]) {
            return Err(DocumentError::RepeatedDigits);
        }

        let digit1 = check_digit(&digits, 10);
        let mut first_ten = digits[..9].to_vec();
        first_ten.push(digit1);
        let digit2 = check_digit(&first_ten, 11);

        if digit1 != digits[9] || digit2 != digits[10] {
            return Err(DocumentError::InvalidCheckDigits);
        }

        Ok(Self(normalized))
    }

    /// The normalized digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Weighted check digit over the first `factor - 1` digits.
fn check_digit(digits: &[u32], factor: u32) -> u32 {
    let total: u32 = digits
        .iter()
        .take(factor as usize - 1)
        .enumerate()
        .map(|(i, d)| d * (factor - i as u32))
        .sum();

    let rest = (total * 10) % 11;
    if rest == 10 {
        0
    } else {
        rest
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl TryFrom<String> for Document {
    type Error = DocumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Document::parse(&value)
    }
}

impl From<Document> for String {
    fn from(document: Document) -> Self {
        document.0
    }
}
