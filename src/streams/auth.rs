//! HMAC-SHA256 request signing for the Data Streams API
//!
//! The string to sign is
//! `"{METHOD} {path?query} {hex(sha256(body))} {client_id} {timestamp_ms}"`,
//! and the hex-encoded MAC goes in `X-Authorization-Signature-SHA256`.

use super::FeedError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TIMESTAMP_HEADER: &str = "X-Authorization-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Authorization-Signature-SHA256";

/// Signs Data Streams requests with the client credentials
#[derive(Clone)]
pub struct StreamsSigner {
    client_id: String,
    client_secret: String,
}

impl StreamsSigner {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Compute the hex signature for a request
    pub fn sign(
        &self,
        method: &str,
        path_and_query: &str,
        body: &[u8],
        timestamp_ms: i64,
    ) -> Result<String, FeedError> {
        let body_hash = hex::encode(Sha256::digest(body));
        let message = format!(
            "{} {} {} {} {}",
            method, path_and_query, body_hash, self.client_id, timestamp_ms
        );

        let mut mac = HmacSha256::new_from_slice(self.client_secret.as_bytes())
            .map_err(|e| FeedError::Signing(e.to_string()))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Authentication headers for a request
    pub fn headers(
        &self,
        method: &str,
        path_and_query: &str,
        body: &[u8],
        timestamp_ms: i64,
    ) -> Result<[(&'static str, String); 3], FeedError> {
        let signature = self.sign(method, path_and_query, body, timestamp_ms)?;
        Ok([
            (AUTHORIZATION_HEADER, self.client_id.clone()),
            (TIMESTAMP_HEADER, timestamp_ms.to_string()),
            (SIGNATURE_HEADER, signature),
        ])
    }
}

impl std::fmt::Debug for StreamsSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamsSigner")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
