//! HS256 session tokens: three base64url segments, HMAC-SHA256 over the
//! first two. Signature is verified before the payload is parsed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rcguard_core::stable_json_bytes;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User document id.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenError {
    Malformed,
    BadSignature,
    Expired,
    Crypto,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::BadSignature => write!(f, "token signature mismatch"),
            Self::Expired => write!(f, "token expired"),
            Self::Crypto => write!(f, "token crypto failure"),
        }
    }
}

impl std::error::Error for TokenError {}

const HEADER_JSON: &[u8] = br#"{"alg":"HS256","typ":"JWT"}"#;

fn sign(message: &[u8], secret: &str) -> Result<Vec<u8>, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::Crypto)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn issue(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    // canonical payload bytes keep equal claim sets byte-identical
    let payload = stable_json_bytes(claims).map_err(|_| TokenError::Crypto)?;
    let head = URL_SAFE_NO_PAD.encode(HEADER_JSON);
    let body = URL_SAFE_NO_PAD.encode(payload);
    let message = format!("{head}.{body}");
    let sig = sign(message.as_bytes(), secret)?;
    Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(sig)))
}

/// `now` is unix seconds; a token whose `exp` is not strictly in the
/// future is rejected.
pub fn verify(token: &str, secret: &str, now: i64) -> Result<Claims, TokenError> {
    let mut parts = token.splitn(3, '.');
    let (Some(head), Some(body), Some(sig)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(TokenError::Malformed);
    };
    let sig = URL_SAFE_NO_PAD
        .decode(sig)
        .map_err(|_| TokenError::Malformed)?;
    let message = format!("{head}.{body}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::Crypto)?;
    mac.update(message.as_bytes());
    mac.verify_slice(&sig)
        .map_err(|_| TokenError::BadSignature)?;
    let payload = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|_| TokenError::Malformed)?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
    if claims.exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}
