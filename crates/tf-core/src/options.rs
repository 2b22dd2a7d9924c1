//! Wire keys the decoders read from an info payload.
//!
//! The remote service renames fields between encoding revisions, so the keys
//! are data rather than constants. Every field defaults to the current
//! revision's name, which makes an empty configuration section valid.

use serde::{Deserialize, Serialize};

/// Names of the info-payload fields consumed during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Keys holding comma-separated stream-descriptor lists, read in order.
    pub stream_map_keys: Vec<String>,
    /// Key holding the thumbnail descriptor list.
    pub thumbnail_key: String,
    /// Keys holding single legacy thumbnail URLs, appended in order.
    pub legacy_thumbnail_keys: Vec<String>,
    /// Key holding an inline playlist manifest.
    pub manifest_key: String,
    /// Key holding an inline streaming-data descriptor list.
    pub streaming_data_key: String,
    /// Signature parameter name used when a descriptor omits `sp`.
    pub default_signature_param: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            stream_map_keys: vec![
                "url_encoded_fmt_stream_map".into(),
                "adaptive_fmts".into(),
            ],
            thumbnail_key: "thumbnail_url".into(),
            legacy_thumbnail_keys: vec![
                "iurlmq".into(),
                "iurlhq".into(),
                "iurlsd".into(),
                "iurlmaxres".into(),
            ],
            manifest_key: "hls_manifest".into(),
            streaming_data_key: "player_streaming_data".into(),
            default_signature_param: "signature".into(),
        }
    }
}

impl DecodeOptions {
    /// Return a list of problems that would make decoding silently miss data.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.stream_map_keys.is_empty() {
            problems.push("stream_map_keys is empty; no progressive or adaptive streams will be read".into());
        }
        for (i, key) in self.stream_map_keys.iter().enumerate() {
            if key.trim().is_empty() {
                problems.push(format!("stream_map_keys[{i}] is empty"));
            }
        }
        for (i, key) in self.legacy_thumbnail_keys.iter().enumerate() {
            if key.trim().is_empty() {
                problems.push(format!("legacy_thumbnail_keys[{i}] is empty"));
            }
        }

        let named = [
            ("thumbnail_key", &self.thumbnail_key),
            ("manifest_key", &self.manifest_key),
            ("streaming_data_key", &self.streaming_data_key),
            ("default_signature_param", &self.default_signature_param),
        ];
        for (name, value) in named {
            if value.trim().is_empty() {
                problems.push(format!("{name} is empty"));
            }
        }

        problems
    }
}
