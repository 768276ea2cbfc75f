// SPDX-License-Identifier: Apache-2.0

//! Document collections over SQLite.
//!
//! Each collection keeps the full entity as canonical JSON in a `doc` column
//! plus the handful of extracted columns its queries filter on. Soft delete
//! sets `deleted_at`; every live read path filters it out. Uniqueness for
//! rc_number and email is enforced with partial indexes over live rows only,
//! so duplicate chassis/engine serials stay representable for fraud checks.

#![forbid(unsafe_code)]

mod audit;
mod error;
mod flags;
mod page;
mod users;
mod vehicles;
mod verifications;

pub use error::StoreError;
pub use page::Page;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY,
    email       TEXT NOT NULL,
    doc         TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL,
    deleted_at  INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS users_live_email
    ON users(email) WHERE deleted_at IS NULL;

CREATE TABLE IF NOT EXISTS vehicles (
    id              TEXT PRIMARY KEY,
    rc_number       TEXT NOT NULL,
    chassis_number  TEXT NOT NULL,
    engine_number   TEXT NOT NULL,
    doc             TEXT NOT NULL,
    created_at      INTEGER NOT NULL,
    updated_at      INTEGER NOT NULL,
    deleted_at      INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS vehicles_live_rc
    ON vehicles(rc_number) WHERE deleted_at IS NULL;
CREATE INDEX IF NOT EXISTS vehicles_chassis ON vehicles(chassis_number);
CREATE INDEX IF NOT EXISTS vehicles_engine ON vehicles(engine_number);

CREATE TABLE IF NOT EXISTS verifications (
    id          TEXT PRIMARY KEY,
    vehicle_id  TEXT NOT NULL,
    doc         TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    deleted_at  INTEGER
);
CREATE INDEX IF NOT EXISTS verifications_vehicle
    ON verifications(vehicle_id, created_at DESC);

CREATE TABLE IF NOT EXISTS fraud_flags (
    id          TEXT PRIMARY KEY,
    vehicle_id  TEXT NOT NULL,
    resolved    INTEGER NOT NULL DEFAULT 0,
    doc         TEXT NOT NULL,
    created_at  INTEGER NOT NULL,
    deleted_at  INTEGER
);
CREATE INDEX IF NOT EXISTS fraud_flags_vehicle
    ON fraud_flags(vehicle_id, resolved);

CREATE TABLE IF NOT EXISTS audit_logs (
    id          TEXT PRIMARY KEY,
    user_id     TEXT,
    entity_id   TEXT NOT NULL,
    doc         TEXT NOT NULL,
    timestamp   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS audit_logs_time ON audit_logs(timestamp DESC);
CREATE INDEX IF NOT EXISTS audit_logs_entity ON audit_logs(entity_id, timestamp DESC);
";

pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "document store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Cheap probe for readiness checks.
    pub fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |_| Ok(()))?;
            Ok(())
        })
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let guard = self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&guard)
    }
}

pub(crate) fn encode_doc<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    Ok(rcguard_core::stable_json_string(value)?)
}

pub(crate) fn decode_doc<T: DeserializeOwned>(
    collection: &'static str,
    id: &str,
    raw: &str,
) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|_| StoreError::Corrupt {
        collection,
        id: id.to_string(),
    })
}

pub(crate) fn millis(ts: chrono::DateTime<chrono::Utc>) -> i64 {
    ts.timestamp_millis()
}
