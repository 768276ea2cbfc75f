// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod canonical;
mod ids;
mod time;

pub use canonical::{stable_json_bytes, stable_json_string};
pub use ids::{validate_doc_id, DocIdError, IdGenerator, DOC_ID_LEN};
pub use time::{now_utc, today_utc, to_rfc3339, unix_millis, unix_seconds};

use sha2::{Digest, Sha256};

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
