//! Signed session tokens.
//!
//! A token is `"<session_id>.<base64url(HMAC-SHA256(session_id))>"`. The
//! signature proves the ID was minted by this server, so a forged cookie
//! never reaches the session store.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};

type HmacSha256 = Hmac<Sha256>;

/// Sign a session ID into a cookie-ready token.
pub fn sign_session_token(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token's signature and recover the session ID.
pub fn parse_session_token(token: &str, secret: &[u8; 32]) -> AccountResult<Uuid> {
    let Some((session_id_str, signature_b64)) = token.split_once('.') else {
        return Err(AccountError::SessionInvalid);
    };

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AccountError::SessionInvalid)?;

    mac.verify_slice(&signature)
        .map_err(|_| AccountError::SessionInvalid)?;

    session_id_str
        .parse()
        .map_err(|_| AccountError::SessionInvalid)
}
