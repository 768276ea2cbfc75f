// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// No live row matched the lookup.
    NotFound(&'static str),
    /// A uniqueness contract was violated (named field).
    Duplicate(&'static str),
    /// A stored document failed to deserialize back into its model type.
    Corrupt { collection: &'static str, id: String },
    Encode(serde_json::Error),
    Sqlite(rusqlite::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Duplicate(field) => write!(f, "duplicate {field}"),
            Self::Corrupt { collection, id } => {
                write!(f, "corrupt document in {collection}: {id}")
            }
            Self::Encode(e) => write!(f, "document encode failed: {e}"),
            Self::Sqlite(e) => write!(f, "sqlite error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

pub(crate) fn map_constraint(err: rusqlite::Error, field: &'static str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Duplicate(field)
        }
        _ => StoreError::Sqlite(err),
    }
}
