// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use rcguard_model::{ChassisNumber, DocId, EngineNumber, RcNumber, Vehicle};

use crate::error::map_constraint;
use crate::{decode_doc, encode_doc, millis, DocumentStore, Page, StoreError};

impl DocumentStore {
    pub fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        let doc = encode_doc(vehicle)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO vehicles
                   (id, rc_number, chassis_number, engine_number, doc,
                    created_at, updated_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
                params![
                    vehicle.id.as_str(),
                    vehicle.rc_number.as_str(),
                    vehicle.chassis_number.as_str(),
                    vehicle.engine_number.as_str(),
                    doc,
                    millis(vehicle.created_at),
                    millis(vehicle.updated_at),
                ],
            )
            .map_err(|e| map_constraint(e, "rc_number"))?;
            Ok(())
        })
    }

    /// Rewrites a live vehicle document in place. `NotFound` if the id does
    /// not exist or the record is soft-deleted.
    pub fn update_vehicle(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        let doc = encode_doc(vehicle)?;
        self.with_conn(|conn| {
            let affected = conn
                .execute(
                    "UPDATE vehicles
                     SET rc_number = ?2, chassis_number = ?3, engine_number = ?4,
                         doc = ?5, updated_at = ?6
                     WHERE id = ?1 AND deleted_at IS NULL",
                    params![
                        vehicle.id.as_str(),
                        vehicle.rc_number.as_str(),
                        vehicle.chassis_number.as_str(),
                        vehicle.engine_number.as_str(),
                        doc,
                        millis(vehicle.updated_at),
                    ],
                )
                .map_err(|e| map_constraint(e, "rc_number"))?;
            if affected == 0 {
                return Err(StoreError::NotFound("vehicle"));
            }
            Ok(())
        })
    }

    pub fn find_vehicle_by_id(&self, id: &DocId) -> Result<Option<Vehicle>, StoreError> {
        self.with_conn(|conn| {
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM vehicles WHERE id = ?1 AND deleted_at IS NULL",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            doc.map(|doc| decode_doc("vehicles", id.as_str(), &doc))
                .transpose()
        })
    }

    pub fn find_vehicle_by_rc(&self, rc: &RcNumber) -> Result<Option<Vehicle>, StoreError> {
        self.with_conn(|conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    "SELECT id, doc FROM vehicles WHERE rc_number = ?1 AND deleted_at IS NULL",
                    params![rc.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            row.map(|(id, doc)| decode_doc("vehicles", &id, &doc))
                .transpose()
        })
    }

    /// Live records sharing this chassis serial, the searched vehicle included.
    pub fn count_by_chassis(&self, chassis: &ChassisNumber) -> Result<u64, StoreError> {
        self.count_serial("chassis_number", chassis.as_str())
    }

    pub fn count_by_engine(&self, engine: &EngineNumber) -> Result<u64, StoreError> {
        self.count_serial("engine_number", engine.as_str())
    }

    fn count_serial(&self, column: &'static str, value: &str) -> Result<u64, StoreError> {
        // column name comes from the two callers above, never from input
        let sql =
            format!("SELECT COUNT(*) FROM vehicles WHERE {column} = ?1 AND deleted_at IS NULL");
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(&sql, params![value], |row| row.get(0))?;
            Ok(count.max(0) as u64)
        })
    }

    pub fn list_vehicles(&self, limit: u32, offset: u64) -> Result<Page<Vehicle>, StoreError> {
        self.with_conn(|conn| {
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM vehicles WHERE deleted_at IS NULL",
                [],
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(
                "SELECT id, doc FROM vehicles WHERE deleted_at IS NULL
                 ORDER BY created_at DESC, id ASC LIMIT ?1 OFFSET ?2",
            )?;
            // saturate instead of wrapping: a negative OFFSET skips nothing
            let rows = stmt.query_map(
                params![i64::from(limit), i64::try_from(offset).unwrap_or(i64::MAX)],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?;
            let mut items = Vec::new();
            for row in rows {
                let (id, doc) = row?;
                items.push(decode_doc("vehicles", &id, &doc)?);
            }
            Ok(Page::new(items, total.max(0) as u64, limit, offset))
        })
    }

    /// Marks the record deleted instead of removing it. The stored document
    /// is rewritten so its own `deleted_at` matches the column.
    pub fn soft_delete_vehicle(
        &self,
        id: &DocId,
        now: DateTime<Utc>,
    ) -> Result<Vehicle, StoreError> {
        let mut vehicle = self
            .find_vehicle_by_id(id)?
            .ok_or(StoreError::NotFound("vehicle"))?;
        vehicle.deleted_at = Some(now);
        vehicle.updated_at = now;
        let doc = encode_doc(&vehicle)?;
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE vehicles SET doc = ?2, updated_at = ?3, deleted_at = ?3
                 WHERE id = ?1 AND deleted_at IS NULL",
                params![id.as_str(), doc, millis(now)],
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound("vehicle"));
            }
            Ok(())
        })?;
        Ok(vehicle)
    }
}
