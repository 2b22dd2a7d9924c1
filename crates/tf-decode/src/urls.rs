//! Helpers for reading hints out of stream URLs.
//!
//! Stream URLs carry their own metadata either as query fields
//! (`?itag=18&expire=1700000000`) or as path pairs
//! (`/itag/93/expire/1700000000/`), depending on which endpoint issued them.

use chrono::{DateTime, Utc};
use tf_core::Itag;

use crate::query::decode_query_string;

/// Look up `name` in the URL's query string, then in its `/name/value/` path pairs.
pub fn url_field(url: &str, name: &str) -> Option<String> {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };

    if let Some(value) = query.and_then(|q| decode_query_string(q).remove(name)) {
        return Some(value);
    }

    let mut segments = path.split('/');
    while let Some(segment) = segments.next() {
        if segment == name {
            return segments.next().filter(|v| !v.is_empty()).map(str::to_string);
        }
    }
    None
}

/// Expiry hint carried by the URL's `expire` field, as unix seconds.
pub fn expiry_hint(url: &str) -> Option<DateTime<Utc>> {
    let secs: i64 = url_field(url, "expire")?.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Format identifier carried by the URL's `itag` field.
pub fn itag_from_url(url: &str) -> Option<Itag> {
    url_field(url, "itag")?.parse().ok()
}

/// Append `name=value` to the URL's query string.
pub fn append_query_param(url: &str, name: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}{}={}",
        urlencoding::encode(name),
        urlencoding::encode(value)
    )
}

/// Whether the URL already carries a `name` query field.
pub fn has_query_param(url: &str, name: &str) -> bool {
    url.split_once('?')
        .is_some_and(|(_, q)| decode_query_string(q).contains_key(name))
}
