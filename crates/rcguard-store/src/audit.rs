// SPDX-License-Identifier: Apache-2.0

use rusqlite::params;

use rcguard_model::AuditLog;

use crate::{decode_doc, encode_doc, millis, DocumentStore, Page, StoreError};

impl DocumentStore {
    /// Append-only; audit rows never soft-delete.
    pub fn append_audit(&self, entry: &AuditLog) -> Result<(), StoreError> {
        let doc = encode_doc(entry)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO audit_logs (id, user_id, entity_id, doc, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id.as_str(),
                    entry.user_id.as_ref().map(|id| id.as_str().to_string()),
                    entry.entity_id,
                    doc,
                    millis(entry.timestamp),
                ],
            )?;
            Ok(())
        })
    }

    /// Newest first.
    pub fn list_audit(&self, limit: u32, offset: u64) -> Result<Page<AuditLog>, StoreError> {
        self.with_conn(|conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM audit_logs", [], |row| row.get(0))?;
            let mut stmt = conn.prepare(
                "SELECT id, doc FROM audit_logs
                 ORDER BY timestamp DESC, id ASC LIMIT ?1 OFFSET ?2",
            )?;
            let rows = stmt.query_map(
                params![i64::from(limit), i64::try_from(offset).unwrap_or(i64::MAX)],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?;
            let mut items = Vec::new();
            for row in rows {
                let (id, doc) = row?;
                items.push(decode_doc("audit_logs", &id, &doc)?);
            }
            Ok(Page::new(items, total.max(0) as u64, limit, offset))
        })
    }
}
