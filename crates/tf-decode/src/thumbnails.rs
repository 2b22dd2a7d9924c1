//! Thumbnail-list decoder.
//!
//! The list is a comma-separated token stream holding descriptors in either
//! of two shapes, which may be mixed:
//!
//! - positional: `url,width,height`
//! - record: a single query-encoded token `url=...&width=...&height=...`
//!
//! A descriptor missing its URL or either dimension is dropped.

use crate::query::decode_query_string;
use crate::types::Thumbnail;

/// Decode a thumbnail list, preserving source order.
pub fn decode_thumbnail_list(input: &str) -> Vec<Thumbnail> {
    let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
    let mut thumbnails = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        i += 1;

        if token.is_empty() {
            continue;
        }

        if is_record_token(token) {
            match decode_record(token) {
                Some(thumbnail) => thumbnails.push(thumbnail),
                None => tracing::debug!(token, "dropping thumbnail record with missing fields"),
            }
            continue;
        }

        if parse_dimension(token).is_some() {
            tracing::debug!(token, "skipping stray thumbnail dimension");
            continue;
        }

        let width = tokens.get(i).copied().and_then(parse_dimension);
        let height = tokens.get(i + 1).copied().and_then(parse_dimension);
        match (width, height) {
            (Some(width), Some(height)) => {
                thumbnails.push(Thumbnail::new(token, width, height));
                i += 2;
            }
            _ => tracing::debug!(url = token, "dropping thumbnail without dimensions"),
        }
    }

    thumbnails
}

/// A record token is a query string; a positional URL has its scheme
/// before any `=`, even when its own query carries a `url` field.
fn is_record_token(token: &str) -> bool {
    let Some((first_key, _)) = token.split_once('=') else {
        return false;
    };
    !first_key.contains("://") && (first_key == "url" || token.contains("&url="))
}

fn decode_record(token: &str) -> Option<Thumbnail> {
    let fields = decode_query_string(token);
    let url = fields.get("url").filter(|u| !u.is_empty())?;
    let width = parse_dimension(fields.get("width")?)?;
    let height = parse_dimension(fields.get("height")?)?;
    Some(Thumbnail::new(url.as_str(), width, height))
}

fn parse_dimension(token: &str) -> Option<u32> {
    token.trim().parse().ok()
}
