//! Form body decoding
//!
//! Decodes `application/x-www-form-urlencoded` request bodies into ordered
//! key/value pairs.

use hyper::header::CONTENT_TYPE;
use hyper::HeaderMap;

const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Submitted form fields in body order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Decode a urlencoded body
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
        Ok(Self { pairs })
    }

    /// Decode a request body according to its content type
    ///
    /// Bodies that are not urlencoded, or fail to decode, yield no fields.
    pub fn from_request(headers: &HeaderMap, body: &[u8]) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        if !is_urlencoded(headers) {
            crate::logger::log_warning("Form body ignored: content type is not urlencoded");
            return Self::default();
        }
        match Self::from_urlencoded(body) {
            Ok(data) => data,
            Err(e) => {
                crate::logger::log_warning(&format!("Malformed form body: {e}"));
                Self::default()
            }
        }
    }

    /// Last submitted value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn is_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(URLENCODED))
}
