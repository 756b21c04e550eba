//! Request-signing schemes required by the partner APIs.
//!
//! Both schemes are partner contracts, not design choices of this crate:
//! the digests have to be reproduced bit-exact or the remote API rejects
//! the request. Both are pure functions of (secret, timestamp, parameters)
//! so they can be tested against golden vectors without any network.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// MD5 parameter signature used by the AliExpress open platform.
///
/// The partner contract: sort all request parameters alphabetically by key,
/// concatenate `secret + key1 + value1 + ... + secret`, MD5 the result and
/// uppercase the hex digest.
///
/// `BTreeMap` gives the required key ordering for free.
#[must_use]
pub fn md5_param_sign(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut buf = String::with_capacity(secret.len() * 2 + 64);
    buf.push_str(secret);
    for (key, value) in params {
        buf.push_str(key);
        buf.push_str(value);
    }
    buf.push_str(secret);

    format!("{:x}", md5::compute(buf.as_bytes())).to_uppercase()
}

/// SHA-256 payload signature used by the Shopee affiliate open API.
///
/// The partner contract: `SHA256(app_id + timestamp_seconds + payload +
/// secret)`, lowercase hex.
#[must_use]
pub fn sha256_payload_sign(app_id: &str, timestamp: i64, payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_id.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Full authorization header value for the Shopee affiliate open API:
/// `SHA256 Credential={app_id}, Timestamp={timestamp}, Signature={digest}`.
#[must_use]
pub fn sha256_auth_header(app_id: &str, timestamp: i64, payload: &str, secret: &str) -> String {
    let signature = sha256_payload_sign(app_id, timestamp, payload, secret);
    format!("SHA256 Credential={app_id}, Timestamp={timestamp}, Signature={signature}")
}
