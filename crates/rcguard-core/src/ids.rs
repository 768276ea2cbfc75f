// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Length of a document id in lowercase hex characters.
pub const DOC_ID_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocIdError {
    WrongLength(usize),
    InvalidChar(char),
}

impl fmt::Display for DocIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength(len) => {
                write!(f, "document id must be {DOC_ID_LEN} hex chars, got {len}")
            }
            Self::InvalidChar(c) => write!(f, "document id contains non-hex char {c:?}"),
        }
    }
}

impl std::error::Error for DocIdError {}

pub fn validate_doc_id(value: &str) -> Result<(), DocIdError> {
    if value.len() != DOC_ID_LEN {
        return Err(DocIdError::WrongLength(value.len()));
    }
    if let Some(c) = value
        .chars()
        .find(|c| !c.is_ascii_hexdigit() || c.is_ascii_uppercase())
    {
        return Err(DocIdError::InvalidChar(c));
    }
    Ok(())
}

/// Process-local generator for document ids.
///
/// Ids are the first 24 hex chars of sha256 over (wall clock nanos, a
/// monotonically increasing counter, an optional scope tag). Uniqueness
/// within a process is guaranteed by the counter; the timestamp keeps ids
/// from colliding across restarts.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn next_id(&self, scope: &str) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let seed = format!("{nanos}:{seq}:{scope}");
        let digest = crate::sha256_hex(seed.as_bytes());
        digest[..DOC_ID_LEN].to_string()
    }
}
