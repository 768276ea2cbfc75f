// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::keys::{DocId, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Export,
}

impl AuditAction {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "CREATE" => Ok(Self::Create),
            "READ" => Ok(Self::Read),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "EXPORT" => Ok(Self::Export),
            _ => Err(ParseError::InvalidFormat("unknown audit action")),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Export => "EXPORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum AuditStatus {
    Success,
    Failure,
}

/// Append-only audit trail entry. Audit rows are never soft-deleted; the
/// trail is the one collection that keeps everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditLog {
    pub id: DocId,
    pub user_id: Option<DocId>,
    pub entity_type: String,
    pub entity_id: String,
    pub action: AuditAction,
    /// Canonical JSON snapshot before the change; `null` for creates.
    pub old_value: Value,
    /// Canonical JSON snapshot after the change; `null` for deletes.
    pub new_value: Value,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AuditStatus,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    #[must_use]
    pub fn success(
        id: DocId,
        user_id: Option<DocId>,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        action: AuditAction,
        old_value: Value,
        new_value: Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            action,
            old_value,
            new_value,
            description: None,
            ip_address: None,
            user_agent: None,
            status: AuditStatus::Success,
            error_message: None,
            timestamp: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audit_action_round_trips_wire_form() {
        for action in [
            AuditAction::Create,
            AuditAction::Read,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Export,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()).expect("parse"), action);
        }
        assert!(AuditAction::parse("create").is_err());
    }

    #[test]
    fn success_entry_has_no_error_fields() {
        let gen = rcguard_core::IdGenerator::new();
        let entry = AuditLog::success(
            DocId::parse(&gen.next_id("audit")).expect("id"),
            None,
            "Vehicle",
            "abc",
            AuditAction::Create,
            Value::Null,
            json!({"rc_number": "MH12AB1234"}),
            rcguard_core::now_utc(),
        );
        assert_eq!(entry.status, AuditStatus::Success);
        assert!(entry.error_message.is_none());
    }
}
