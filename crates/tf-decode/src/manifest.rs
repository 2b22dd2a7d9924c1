//! HLS master-playlist decoder.
//!
//! Only variant streams matter here: each `#EXT-X-STREAM-INF` tag followed
//! by its URI line yields one [`ManifestVariant`]. Every other tag and
//! comment is ignored.

use serde::{Deserialize, Serialize};
use tf_core::{Error, Itag, PayloadKind, Result};

use crate::types::StreamDescriptor;
use crate::urls;

const HEADER: &str = "#EXTM3U";
const STREAM_INF: &str = "#EXT-X-STREAM-INF:";

/// A variant stream declared by a master playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestVariant {
    /// Format identifier recovered from the URI, when it carries one.
    pub itag: Option<Itag>,
    /// Peak bandwidth in bits per second.
    pub bandwidth: u64,
    /// Optional resolution as (width, height).
    pub resolution: Option<(u32, u32)>,
    /// Codec string (e.g. "avc1.4d401f,mp4a.40.2").
    pub codecs: Option<String>,
    pub frame_rate: Option<f64>,
    /// URI of the variant's media playlist.
    pub uri: String,
}

impl ManifestVariant {
    /// Project into a stream descriptor. Variants without an itag cannot be
    /// keyed and yield `None`.
    pub fn to_stream(&self) -> Option<StreamDescriptor> {
        let itag = self.itag?;
        let mut stream = StreamDescriptor::with_url(itag, self.uri.clone());
        stream.bitrate = Some(self.bandwidth);
        stream.resolution = self.resolution;
        stream.codecs = self.codecs.clone();
        stream.mime_type = Some("application/x-mpegURL".into());
        stream.fps = self.frame_rate.map(|f| f.round() as u32);
        stream.quality_label = self.resolution.map(|(_, h)| format!("{h}p"));
        Some(stream)
    }
}

/// Decode a master playlist into its variant streams.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] when the payload is blank or does not
/// open with `#EXTM3U`. Individual variants that fail to parse are skipped.
pub fn decode_manifest(input: &str) -> Result<Vec<ManifestVariant>> {
    let mut lines = input
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    match lines.next() {
        None => return Err(Error::malformed(PayloadKind::Manifest, "payload is empty")),
        Some(first) if first != HEADER => {
            return Err(Error::malformed(
                PayloadKind::Manifest,
                format!("expected {HEADER} header, found {first:?}"),
            ))
        }
        Some(_) => {}
    }

    let mut variants = Vec::new();
    // Attributes of the last STREAM-INF tag, waiting for their URI line.
    // `Some(None)` marks a tag that failed to parse: its URI is swallowed.
    let mut pending: Option<Option<VariantAttributes>> = None;

    for line in lines {
        if let Some(attributes) = line.strip_prefix(STREAM_INF) {
            let parsed = VariantAttributes::parse(attributes);
            if parsed.is_none() {
                tracing::debug!(line, "skipping unparseable stream variant");
            }
            pending = Some(parsed);
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        match pending.take() {
            Some(Some(attributes)) => variants.push(attributes.into_variant(line)),
            Some(None) => {}
            None => tracing::debug!(uri = line, "ignoring URI without stream variant tag"),
        }
    }

    Ok(variants)
}

struct VariantAttributes {
    bandwidth: u64,
    resolution: Option<(u32, u32)>,
    codecs: Option<String>,
    frame_rate: Option<f64>,
}

impl VariantAttributes {
    fn parse(list: &str) -> Option<Self> {
        let mut bandwidth = None;
        let mut resolution = None;
        let mut codecs = None;
        let mut frame_rate = None;

        for (name, value) in split_attributes(list) {
            match name {
                "BANDWIDTH" => bandwidth = value.parse().ok(),
                "RESOLUTION" => resolution = parse_resolution(&value),
                "CODECS" => codecs = Some(value).filter(|c| !c.is_empty()),
                "FRAME-RATE" => frame_rate = value.parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            bandwidth: bandwidth?,
            resolution,
            codecs,
            frame_rate,
        })
    }

    fn into_variant(self, uri: &str) -> ManifestVariant {
        ManifestVariant {
            itag: urls::itag_from_url(uri),
            bandwidth: self.bandwidth,
            resolution: self.resolution,
            codecs: self.codecs,
            frame_rate: self.frame_rate,
            uri: uri.to_string(),
        }
    }
}

/// Split an attribute list on commas that sit outside quoted strings.
fn split_attributes(list: &str) -> Vec<(&str, String)> {
    let mut attributes = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in list.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                push_attribute(&mut attributes, &list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_attribute(&mut attributes, &list[start..]);

    attributes
}

fn push_attribute<'a>(attributes: &mut Vec<(&'a str, String)>, raw: &'a str) {
    if let Some((name, value)) = raw.split_once('=') {
        let value = value.trim().trim_matches('"').to_string();
        attributes.push((name.trim(), value));
    }
}

/// Parse a `WIDTHxHEIGHT` pair.
pub(crate) fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
