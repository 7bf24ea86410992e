//! Raw HTTP response returned by a connection.

use bytes::Bytes;
use std::collections::BTreeMap;

/// An HTTP response before any HAL decoding.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (keys lowercased)
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Bytes,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as UTF-8 text, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
