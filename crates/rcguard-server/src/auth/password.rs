//! PBKDF2-HMAC-SHA256 password hashing. Encoded form is
//! `pbkdf2-sha256$<iterations>$<salt>$<hash_hex>`; verification recomputes
//! with the stored parameters and compares in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PasswordError {
    Malformed,
    Crypto,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed password hash"),
            Self::Crypto => write!(f, "password crypto failure"),
        }
    }
}

impl std::error::Error for PasswordError {}

// One HMAC-SHA256 block covers the full 32-byte derived key, so the
// PBKDF2 loop never needs a second block.
fn derive(password: &str, salt: &[u8], iterations: u32) -> Result<[u8; KEY_LEN], PasswordError> {
    let mut mac =
        HmacSha256::new_from_slice(password.as_bytes()).map_err(|_| PasswordError::Crypto)?;
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut round: [u8; KEY_LEN] = mac.finalize().into_bytes().into();
    let mut out = round;
    for _ in 1..iterations {
        let mut mac = HmacSha256::new_from_slice(password.as_bytes())
            .map_err(|_| PasswordError::Crypto)?;
        mac.update(&round);
        round = mac.finalize().into_bytes().into();
        for (acc, byte) in out.iter_mut().zip(round.iter()) {
            *acc ^= byte;
        }
    }
    Ok(out)
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        },
    )
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn hash_password(
    password: &str,
    iterations: u32,
    salt: &str,
) -> Result<String, PasswordError> {
    let key = derive(password, salt.as_bytes(), iterations)?;
    Ok(format!("{SCHEME}${iterations}${salt}${}", hex_encode(&key)))
}

pub fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let mut parts = encoded.splitn(4, '$');
    let (Some(scheme), Some(iters), Some(salt), Some(hash)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordError::Malformed);
    };
    if scheme != SCHEME {
        return Err(PasswordError::Malformed);
    }
    let iterations: u32 = iters.parse().map_err(|_| PasswordError::Malformed)?;
    if iterations == 0 {
        return Err(PasswordError::Malformed);
    }
    let key = derive(password, salt.as_bytes(), iterations)?;
    Ok(constant_time_eq(hex_encode(&key).as_bytes(), hash.as_bytes()))
}
