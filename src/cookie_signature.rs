//! Signed cookie values
//!
//! A signed value has the form `value + "." + base64url(hmac_sha256(name + "=" + value))`.
//! The cookie name is part of the MAC input, so a value signed for one
//! session name does not verify under another.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(name: &str, value: &str, secret: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(name.as_bytes());
    mac.update(b"=");
    mac.update(value.as_bytes());
    mac
}

/// Sign `value` for the cookie called `name`
pub fn sign(name: &str, value: &str, secret: &str) -> String {
    let tag = mac_for(name, value, secret).finalize().into_bytes();
    format!("{}.{}", value, URL_SAFE_NO_PAD.encode(tag))
}

/// Verify a signed value for the cookie called `name`.
/// Returns the original value if the signature is valid, None otherwise.
pub fn unsign(name: &str, signed_value: &str, secret: &str) -> Option<String> {
    let (value, signature) = signed_value.rsplit_once('.')?;
    let tag = URL_SAFE_NO_PAD.decode(signature).ok()?;

    // verify_slice compares in constant time
    mac_for(name, value, secret)
        .verify_slice(&tag)
        .ok()
        .map(|_| value.to_string())
}

/// Try to unsign with multiple secrets (for secret rotation)
pub fn unsign_with_secrets(name: &str, signed_value: &str, secrets: &[String]) -> Option<String> {
    secrets
        .iter()
        .find_map(|secret| unsign(name, signed_value, secret))
}
