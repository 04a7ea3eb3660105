//! Page query-string handling
//!
//! Parsing follows the browser's `URLSearchParams`: `+` is a space, bad
//! percent sequences are kept as-is and invalid UTF-8 becomes U+FFFD.

use std::borrow::Cow;

/// Parsed query string, in original order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a `location.search` string, with or without the leading `?`
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);

        let pairs = search
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                (form_decode(key), form_decode(value))
            })
            .collect();

        Self { pairs }
    }

    /// First value for `key`, like `URLSearchParams.get`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value for `key`
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Strict `decodeURIComponent`.
///
/// Returns `None` when a `%` is not followed by two hex digits or the
/// decoded bytes are not UTF-8.
pub fn decode_uri_component(value: &str) -> Option<Cow<'_, str>> {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let well_formed = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !well_formed {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    urlencoding::decode(value).ok()
}
