use rcguard_core::now_utc;
use rcguard_model::{AuditAction, AuditLog, DocId};
use serde_json::Value;
use tracing::warn;

use crate::AppState;

/// Best-effort audit append. A failed write is logged, never surfaced;
/// audit problems must not fail the request that triggered them.
#[allow(clippy::too_many_arguments)]
pub(crate) fn record(
    state: &AppState,
    user_id: Option<DocId>,
    entity_type: &'static str,
    entity_id: &str,
    action: AuditAction,
    old_value: Value,
    new_value: Value,
    description: Option<&str>,
) {
    if !state.api.enable_audit_log {
        return;
    }
    let Ok(id) = DocId::parse(&state.ids.next_id("audit_logs")) else {
        warn!(entity = entity_type, "audit id generation failed");
        return;
    };
    let mut entry = AuditLog::success(
        id,
        user_id,
        entity_type,
        entity_id,
        action,
        old_value,
        new_value,
        now_utc(),
    );
    entry.description = description.map(str::to_string);
    if let Err(err) = state.store.append_audit(&entry) {
        warn!(error = %err, entity = entity_type, action = action.as_str(), "audit append failed");
    }
}
