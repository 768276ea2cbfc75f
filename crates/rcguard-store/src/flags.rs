// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use rcguard_model::{DocId, FraudFlag};

use crate::{decode_doc, encode_doc, millis, DocumentStore, StoreError};

impl DocumentStore {
    pub fn insert_fraud_flag(&self, flag: &FraudFlag) -> Result<(), StoreError> {
        let doc = encode_doc(flag)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO fraud_flags (id, vehicle_id, resolved, doc, created_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
                params![
                    flag.id.as_str(),
                    flag.vehicle_id.as_str(),
                    i64::from(flag.resolved),
                    doc,
                    millis(flag.created_at),
                ],
            )?;
            Ok(())
        })
    }

    /// Flags for one vehicle, optionally filtered by resolution state.
    pub fn list_flags_for_vehicle(
        &self,
        vehicle_id: &DocId,
        resolved: Option<bool>,
    ) -> Result<Vec<FraudFlag>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, doc FROM fraud_flags
                 WHERE vehicle_id = ?1
                   AND deleted_at IS NULL
                   AND (?2 IS NULL OR resolved = ?2)
                 ORDER BY created_at DESC, id ASC",
            )?;
            let state: Option<i64> = resolved.map(i64::from);
            let rows = stmt.query_map(params![vehicle_id.as_str(), state], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut items = Vec::new();
            for row in rows {
                let (id, doc) = row?;
                items.push(decode_doc("fraud_flags", &id, &doc)?);
            }
            Ok(items)
        })
    }

    /// Read and rewrite happen under one connection lock so the flag cannot
    /// change between them.
    pub fn resolve_flag(
        &self,
        id: &DocId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FraudFlag, StoreError> {
        self.with_conn(|conn| {
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM fraud_flags WHERE id = ?1 AND deleted_at IS NULL",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            let mut flag = doc
                .map(|doc| decode_doc::<FraudFlag>("fraud_flags", id.as_str(), &doc))
                .transpose()?
                .ok_or(StoreError::NotFound("fraud flag"))?;
            flag.resolve(notes, now);
            let doc = encode_doc(&flag)?;
            let changed = conn.execute(
                "UPDATE fraud_flags SET resolved = 1, doc = ?2
                 WHERE id = ?1 AND deleted_at IS NULL",
                params![id.as_str(), doc],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound("fraud flag"));
            }
            Ok(flag)
        })
    }
}
