//! Stream-descriptor-list decoder.
//!
//! Each element of the list is itself a query string describing one stream:
//!
//! ```text
//! itag=22&url=https%3A%2F%2F...&type=video%2Fmp4%3B+codecs%3D%22avc1.64001F%2C+mp4a.40.2%22&quality=hd720
//! ```
//!
//! Protected streams carry their URL and signature inside a nested
//! `signatureCipher` (or older `cipher`) query string, or as top-level `s`
//! and `sp` fields. An already-decoded `sig` is appended to the URL directly.

use tf_core::{DecodeOptions, Itag};

use crate::manifest::parse_resolution;
use crate::query::{decode_query_string, QueryMap};
use crate::types::{CipherReference, StreamDescriptor};
use crate::urls;

/// Decode a comma-separated list of stream descriptors.
///
/// Elements without a parseable `itag` cannot be keyed and are dropped.
pub fn decode_stream_list(input: &str, options: &DecodeOptions) -> Vec<StreamDescriptor> {
    decode_elements(input.split(','), options)
}

/// Decode a streaming-data payload: the same element grammar as
/// [`decode_stream_list`], delimited by commas or newlines.
pub fn decode_streaming_data(input: &str, options: &DecodeOptions) -> Vec<StreamDescriptor> {
    decode_elements(input.split([',', '\n']), options)
}

fn decode_elements<'a>(
    elements: impl Iterator<Item = &'a str>,
    options: &DecodeOptions,
) -> Vec<StreamDescriptor> {
    elements
        .map(str::trim)
        .filter(|element| !element.is_empty())
        .filter_map(|element| {
            let stream = decode_descriptor(&decode_query_string(element), options);
            if stream.is_none() {
                tracing::debug!(element, "dropping stream descriptor without itag");
            }
            stream
        })
        .collect()
}

/// Project one decoded element into a [`StreamDescriptor`].
pub fn decode_descriptor(fields: &QueryMap, options: &DecodeOptions) -> Option<StreamDescriptor> {
    let itag: Itag = fields.get("itag")?.parse().ok()?;

    let nested = fields
        .get("signatureCipher")
        .or_else(|| fields.get("cipher"))
        .map(|c| decode_query_string(c))
        .unwrap_or_default();
    let lookup = |key: &str| {
        fields
            .get(key)
            .or_else(|| nested.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    };

    let signature_param = lookup("sp")
        .unwrap_or(options.default_signature_param.as_str())
        .to_string();
    let mut url = lookup("url").map(str::to_string);

    let cipher = lookup("s").map(|signature| CipherReference {
        signature: signature.to_string(),
        signature_param: signature_param.clone(),
    });

    if cipher.is_none() {
        if let (Some(base), Some(sig)) = (url.as_deref(), lookup("sig")) {
            if !urls::has_query_param(base, &signature_param) {
                url = Some(urls::append_query_param(base, &signature_param, sig));
            }
        }
    }

    let (mime_type, codecs) = lookup("type").map(split_mime_type).unwrap_or_default();

    Some(StreamDescriptor {
        itag,
        expires_at: url.as_deref().and_then(urls::expiry_hint),
        url,
        requires_cipher_decoding: cipher.is_some(),
        cipher,
        mime_type,
        codecs,
        quality_label: lookup("quality_label").or_else(|| lookup("quality")).map(str::to_string),
        bitrate: lookup("bitrate").and_then(|b| b.parse().ok()),
        resolution: lookup("size").and_then(parse_resolution),
        fps: lookup("fps").and_then(|f| f.parse().ok()),
        content_length: lookup("clen").and_then(|c| c.parse().ok()),
    })
}

/// Split `video/mp4; codecs="avc1.64001F, mp4a.40.2"` into its mime type and codecs.
fn split_mime_type(raw: &str) -> (Option<String>, Option<String>) {
    let mut parts = raw.split(';');
    let mime = parts
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let codecs = parts
        .filter_map(|p| p.trim().strip_prefix("codecs="))
        .map(|c| c.trim_matches('"').to_string())
        .next();
    (mime, codecs)
}
