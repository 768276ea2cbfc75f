// SPDX-License-Identifier: Apache-2.0

use rusqlite::{params, OptionalExtension};

use rcguard_model::{DocId, Email, User};

use crate::error::map_constraint;
use crate::{decode_doc, encode_doc, millis, DocumentStore, StoreError};

impl DocumentStore {
    pub fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let doc = encode_doc(user)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, doc, created_at, updated_at, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
                params![
                    user.id.as_str(),
                    user.email.as_str(),
                    doc,
                    millis(user.created_at),
                    millis(user.updated_at),
                ],
            )
            .map_err(|e| map_constraint(e, "email"))?;
            Ok(())
        })
    }

    pub fn email_exists(&self, email: &Email) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE email = ?1 AND deleted_at IS NULL",
                params![email.as_str()],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    pub fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    "SELECT id, doc FROM users WHERE email = ?1 AND deleted_at IS NULL",
                    params![email.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            row.map(|(id, doc)| decode_doc("users", &id, &doc)).transpose()
        })
    }

    pub fn find_user_by_id(&self, id: &DocId) -> Result<Option<User>, StoreError> {
        self.with_conn(|conn| {
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM users WHERE id = ?1 AND deleted_at IS NULL",
                    params![id.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            doc.map(|doc| decode_doc("users", id.as_str(), &doc))
                .transpose()
        })
    }
}
