//! URL-query-string codec.

use std::collections::BTreeMap;

use tf_core::{Error, PayloadKind, Result};

/// Decoded key/value mapping of a query string.
///
/// Ordered so that [`encode_query_string`] output is deterministic.
pub type QueryMap = BTreeMap<String, String>;

/// Decode a `key=value&key=value` string into a mapping.
///
/// - `+` is read as a space, then percent-escapes are decoded in both keys
///   and values. Escapes that do not decode are kept verbatim.
/// - Each field splits at its first `=`, so values may contain `=`.
/// - Fields without `=` or with an empty key are skipped.
/// - The last occurrence of a duplicate key wins.
pub fn decode_query_string(input: &str) -> QueryMap {
    let mut map = QueryMap::new();

    for field in input.split('&') {
        if field.is_empty() {
            continue;
        }
        let Some((raw_key, raw_value)) = field.split_once('=') else {
            tracing::debug!(field, "skipping query field without '='");
            continue;
        };
        if raw_key.is_empty() {
            tracing::debug!(field, "skipping query field with empty key");
            continue;
        }

        let key = decode_component(raw_key);
        let value = decode_component(raw_value);
        if let Some(previous) = map.insert(key, value) {
            tracing::debug!(key = raw_key, %previous, "duplicate query key, last value wins");
        }
    }

    map
}

/// Decode a query string that must contain at least one field.
///
/// Used for payloads that are mandatory, such as the info payload: a blank
/// string, or one with no `key=value` field at all, cannot be segmented.
pub fn decode_required(input: &str, payload: PayloadKind) -> Result<QueryMap> {
    if input.trim().is_empty() {
        return Err(Error::malformed(payload, "payload is empty"));
    }

    let map = decode_query_string(input.trim());
    if map.is_empty() {
        return Err(Error::malformed(
            payload,
            "no key=value field could be segmented",
        ));
    }
    Ok(map)
}

/// Encode a mapping back into query-string form.
///
/// Keys come out sorted and both sides are percent-encoded, so decoding the
/// result yields the same mapping.
pub fn encode_query_string(map: &QueryMap) -> String {
    map.iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a single query component (`+` as space, then percent-escapes).
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
