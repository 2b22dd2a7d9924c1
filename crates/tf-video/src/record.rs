//! The video record: decoded metadata plus stream descriptors keyed by itag.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tf_core::{Itag, VideoId};
use tf_decode::{QueryMap, StreamDescriptor, Thumbnail};

/// Scalar metadata about a video. Every field is optional and filled in as
/// sources are merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub channel_id: Option<String>,
    pub description: Option<String>,
    pub duration: Option<Duration>,
    pub upload_date: Option<NaiveDate>,
    pub view_count: Option<u64>,
    pub is_live: Option<bool>,
    /// URL of the HLS master playlist, for live videos.
    pub live_stream_url: Option<String>,
    /// URL of the DASH manifest listing adaptive streams.
    pub dash_manifest_url: Option<String>,
    /// Reason given by the upstream service when it refused playback.
    pub unavailable_reason: Option<String>,
}

impl Metadata {
    /// Extract metadata from a decoded info payload. Empty values count as
    /// absent; values that fail to parse are ignored.
    pub(crate) fn from_fields(fields: &QueryMap) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let unavailable_reason = if text("status").as_deref() == Some("fail") {
            text("reason")
                .or_else(|| text("errorcode").map(|code| format!("error code {code}")))
                .or_else(|| Some("playback refused".to_string()))
        } else {
            None
        };

        Self {
            title: text("title"),
            author: text("author"),
            channel_id: text("ucid").or_else(|| text("channel_id")),
            description: text("description").or_else(|| text("shortdescription")),
            duration: text("length_seconds")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            upload_date: text("upload_date").and_then(|d| parse_upload_date(&d)),
            view_count: text("view_count").and_then(|v| v.parse().ok()),
            is_live: text("live_playback").map(|v| v == "1" || v.eq_ignore_ascii_case("true")),
            live_stream_url: text("hlsvp"),
            dash_manifest_url: text("dashmpd"),
            unavailable_reason,
        }
    }
}

fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .ok()
}

/// A partially or fully populated description of one video.
///
/// Records are values: construction and [`merge`](crate::merge()) hand back
/// fresh records and nothing mutates one in place afterwards. The identifier
/// never changes once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub(crate) id: VideoId,
    pub(crate) metadata: Metadata,
    pub(crate) thumbnails: Vec<Thumbnail>,
    pub(crate) streams: BTreeMap<Itag, StreamDescriptor>,
    pub(crate) expiration: Option<DateTime<Utc>>,
}

impl VideoRecord {
    /// An empty record for `id`.
    pub(crate) fn empty(id: VideoId) -> Self {
        Self {
            id,
            metadata: Metadata::default(),
            thumbnails: Vec::new(),
            streams: BTreeMap::new(),
            expiration: None,
        }
    }

    pub fn id(&self) -> &VideoId {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Thumbnails in source order, across all merged sources.
    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    /// Stream descriptors keyed by itag.
    pub fn streams(&self) -> &BTreeMap<Itag, StreamDescriptor> {
        &self.streams
    }

    pub fn stream(&self, itag: Itag) -> Option<&StreamDescriptor> {
        self.streams.get(&itag)
    }

    /// The earliest expiry hint among the streams.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Whether any stream carries a URL.
    pub fn has_playable_streams(&self) -> bool {
        self.streams.values().any(StreamDescriptor::is_playable)
    }

    /// Add a stream, folding it into an existing descriptor with the same itag.
    pub(crate) fn absorb_stream(&mut self, stream: StreamDescriptor) {
        match self.streams.get_mut(&stream.itag) {
            Some(existing) => crate::merge::merge_stream(existing, stream),
            None => {
                self.streams.insert(stream.itag, stream);
            }
        }
    }

    pub(crate) fn recompute_expiration(&mut self) {
        self.expiration = earliest_expiry(self.streams.values());
    }
}

/// Minimum expiry across descriptors. Descriptors without a hint are skipped.
pub(crate) fn earliest_expiry<'a>(
    streams: impl Iterator<Item = &'a StreamDescriptor>,
) -> Option<DateTime<Utc>> {
    streams.filter_map(|s| s.expires_at).min()
}
