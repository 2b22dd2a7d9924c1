//! The whole pipeline in one call: decode, merge, validate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tf_core::{DecodeOptions, Itag, Result};

use crate::merge::merge;
use crate::record::VideoRecord;
use crate::validate::{validate, ValidatedVideo};

/// Raw payloads fetched for one video by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payloads {
    /// The query-string encoded info payload. Required.
    pub info: String,
    /// An HLS master playlist fetched separately.
    pub manifest: Option<String>,
    /// A streaming-data descriptor list fetched separately.
    pub streaming_data: Option<String>,
    /// Direct URLs read from a DASH manifest.
    pub dash_stream_urls: BTreeMap<Itag, String>,
}

impl Payloads {
    pub fn new(info: impl Into<String>) -> Self {
        Self {
            info: info.into(),
            ..Self::default()
        }
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    pub fn with_streaming_data(mut self, payload: impl Into<String>) -> Self {
        self.streaming_data = Some(payload.into());
        self
    }

    pub fn with_dash_stream_url(mut self, itag: Itag, url: impl Into<String>) -> Self {
        self.dash_stream_urls.insert(itag, url.into());
        self
    }
}

/// Resolve `id` from its payloads using the default wire keys.
///
/// # Errors
///
/// Fails on a blank identifier, on any payload that cannot be segmented,
/// and with [`Error::NoPlayableStreams`](tf_core::Error::NoPlayableStreams)
/// when no source yields a stream URL.
pub fn resolve(id: &str, payloads: &Payloads) -> Result<ValidatedVideo> {
    resolve_with(id, payloads, &DecodeOptions::default())
}

/// [`resolve`] with explicit wire keys.
pub fn resolve_with(id: &str, payloads: &Payloads, options: &DecodeOptions) -> Result<ValidatedVideo> {
    let mut record = VideoRecord::supplemental_with(id, &payloads.info, options)?;

    if let Some(manifest) = &payloads.manifest {
        record = merge(record, VideoRecord::from_manifest(id, manifest)?);
    }
    if let Some(payload) = &payloads.streaming_data {
        record = merge(
            record,
            VideoRecord::from_streaming_data_with(id, payload, options)?,
        );
    }
    let record = record.with_dash_stream_urls(
        payloads
            .dash_stream_urls
            .iter()
            .map(|(itag, url)| (*itag, url.as_str())),
    );

    let video = validate(record)?;
    tracing::info!(
        id = %video.id(),
        streams = video.streams().len(),
        expires = ?video.expiration(),
        "resolved video"
    );
    Ok(video)
}
