// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{DocId, Email, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Role {
    Public,
    Buyer,
    Police,
    RtoAdmin,
}

impl Role {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "public" => Ok(Self::Public),
            "buyer" => Ok(Self::Buyer),
            "police" => Ok(Self::Police),
            "rto_admin" => Ok(Self::RtoAdmin),
            _ => Err(ParseError::InvalidFormat(
                "role must be one of public, buyer, police, rto_admin",
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Buyer => "buyer",
            Self::Police => "police",
            Self::RtoAdmin => "rto_admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Public
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: DocId,
    pub email: Email,
    /// PBKDF2 hash string, never exposed on the wire.
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    #[must_use]
    pub fn new(
        id: DocId,
        email: Email,
        password_hash: String,
        full_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            full_name,
            role: Role::Public,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// A user may sign in only while active and not soft-deleted.
    #[must_use]
    pub fn can_sign_in(&self) -> bool {
        self.is_active && !self.is_deleted()
    }
}
