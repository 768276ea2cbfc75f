// SPDX-License-Identifier: Apache-2.0

use rusqlite::params;

use rcguard_model::{DocId, Verification};

use crate::{decode_doc, encode_doc, millis, DocumentStore, StoreError};

impl DocumentStore {
    pub fn insert_verification(&self, verification: &Verification) -> Result<(), StoreError> {
        let doc = encode_doc(verification)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO verifications (id, vehicle_id, doc, created_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, NULL)",
                params![
                    verification.id.as_str(),
                    verification.vehicle_id.as_str(),
                    doc,
                    millis(verification.created_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Newest first.
    pub fn list_verifications_for_vehicle(
        &self,
        vehicle_id: &DocId,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Verification>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, doc FROM verifications
                 WHERE vehicle_id = ?1 AND deleted_at IS NULL
                 ORDER BY created_at DESC, id ASC LIMIT ?2 OFFSET ?3",
            )?;
            let rows = stmt.query_map(
                params![
                    vehicle_id.as_str(),
                    i64::from(limit),
                    i64::try_from(offset).unwrap_or(i64::MAX),
                ],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?;
            let mut items = Vec::new();
            for row in rows {
                let (id, doc) = row?;
                items.push(decode_doc("verifications", &id, &doc)?);
            }
            Ok(items)
        })
    }
}
