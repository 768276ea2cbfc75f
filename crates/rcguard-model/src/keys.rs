// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const RC_NUMBER_MIN_LEN: usize = 4;
pub const RC_NUMBER_MAX_LEN: usize = 32;
pub const SERIAL_MAX_LEN: usize = 64;
pub const EMAIL_MAX_LEN: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::TooShort(name, min) => write!(f, "{name} shorter than min length {min}"),
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Registration-certificate number, the primary vehicle lookup key.
/// Uppercased on parse so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RcNumber(String);

impl RcNumber {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let normalized = input.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(ParseError::Empty("rc_number"));
        }
        if normalized.len() < RC_NUMBER_MIN_LEN {
            return Err(ParseError::TooShort("rc_number", RC_NUMBER_MIN_LEN));
        }
        if normalized.len() > RC_NUMBER_MAX_LEN {
            return Err(ParseError::TooLong("rc_number", RC_NUMBER_MAX_LEN));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ParseError::InvalidFormat(
                "rc_number must contain only [A-Z0-9-]",
            ));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RcNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChassisNumber(String);

impl ChassisNumber {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_serial("chassis_number", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EngineNumber(String);

impl EngineNumber {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_serial("engine_number", input).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_serial(name: &'static str, input: &str) -> Result<String, ParseError> {
    let normalized = input.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(ParseError::Empty(name));
    }
    if normalized.len() > SERIAL_MAX_LEN {
        return Err(ParseError::TooLong(name, SERIAL_MAX_LEN));
    }
    if !normalized
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ParseError::InvalidFormat(
            "serial numbers must contain only [A-Z0-9-]",
        ));
    }
    Ok(normalized)
}

/// Lowercased email address. Shape check only: one '@' with a non-empty
/// local part and a domain containing a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ParseError::Empty("email"));
        }
        if normalized.len() > EMAIL_MAX_LEN {
            return Err(ParseError::TooLong("email", EMAIL_MAX_LEN));
        }
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(ParseError::InvalidFormat("email must contain '@'"));
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ParseError::InvalidFormat("email has malformed parts"));
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(ParseError::InvalidFormat("email domain is malformed"));
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 24-hex document id shared by every collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        rcguard_core::validate_doc_id(input)
            .map_err(|_| ParseError::InvalidFormat("document id must be 24 lowercase hex chars"))?;
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
