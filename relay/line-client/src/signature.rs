//! Webhook request signing.
//!
//! The platform signs every callback body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in `x-line-signature`.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

fn mac(channel_secret: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    mac
}

/// Base64-encoded signature for `body`.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    BASE64_STANDARD.encode(mac(channel_secret, body).finalize().into_bytes())
}

/// Verify `signature` against `body` in constant time.
pub fn verify(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = BASE64_STANDARD.decode(signature.trim()) else {
        tracing::debug!("signature is not valid base64");
        return false;
    };
    mac(channel_secret, body).verify_slice(&expected).is_ok()
}
