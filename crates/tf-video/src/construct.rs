//! Building records from raw payloads.

use tf_core::{DecodeOptions, Error, Itag, PayloadKind, Result, VideoId};
use tf_decode::query::decode_required;
use tf_decode::{
    decode_manifest, decode_stream_list, decode_streaming_data, decode_thumbnail_list,
    QueryMap, StreamDescriptor, Thumbnail,
};

use crate::merge::merge;
use crate::record::{Metadata, VideoRecord};

impl VideoRecord {
    /// Build the initial record for `id` from its info payload.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidIdentifier`] when `id` is blank, whatever the payload.
    /// - [`Error::MalformedPayload`] when the info payload has no fields.
    /// - [`Error::NoPlayableStreams`] when no decoded stream carries a URL.
    pub fn construct(id: &str, info: &str) -> Result<Self> {
        Self::construct_with(id, info, &DecodeOptions::default())
    }

    /// [`construct`](Self::construct) with explicit wire keys.
    pub fn construct_with(id: &str, info: &str, options: &DecodeOptions) -> Result<Self> {
        let record = Self::supplemental_with(id, info, options)?;
        if !record.has_playable_streams() {
            let reason = record.metadata.unavailable_reason.clone();
            return Err(Error::no_playable_streams(record.id, reason));
        }

        tracing::debug!(
            id = %record.id,
            streams = record.streams.len(),
            thumbnails = record.thumbnails.len(),
            "constructed video record"
        );
        Ok(record)
    }

    /// Decode an info payload without requiring any stream.
    ///
    /// Used for later payloads that will be merged into a base record, and
    /// for the first payload when other sources are still to come.
    pub fn supplemental(id: &str, info: &str) -> Result<Self> {
        Self::supplemental_with(id, info, &DecodeOptions::default())
    }

    pub fn supplemental_with(id: &str, info: &str, options: &DecodeOptions) -> Result<Self> {
        let id = VideoId::new(id)?;
        let fields = decode_required(info, PayloadKind::Info)?;
        Ok(decode_info(id, &fields, options))
    }

    /// A record holding the variants of an HLS master playlist.
    ///
    /// Variants whose URI carries no itag cannot be keyed and are left out.
    pub fn from_manifest(id: &str, manifest: &str) -> Result<Self> {
        let id = VideoId::new(id)?;
        let streams = manifest_streams(manifest)?;
        Ok(Self::from_streams(id, streams))
    }

    /// A record holding the descriptors of a streaming-data payload.
    pub fn from_streaming_data(id: &str, payload: &str) -> Result<Self> {
        Self::from_streaming_data_with(id, payload, &DecodeOptions::default())
    }

    pub fn from_streaming_data_with(
        id: &str,
        payload: &str,
        options: &DecodeOptions,
    ) -> Result<Self> {
        let id = VideoId::new(id)?;
        if payload.trim().is_empty() {
            return Err(Error::malformed(PayloadKind::StreamList, "payload is empty"));
        }
        Ok(Self::from_streams(id, decode_streaming_data(payload, options)))
    }

    /// Merge direct URLs taken from a DASH manifest, keyed by itag.
    #[must_use]
    pub fn with_dash_stream_urls<I, S>(self, urls: I) -> Self
    where
        I: IntoIterator<Item = (Itag, S)>,
        S: Into<String>,
    {
        let streams: Vec<_> = urls
            .into_iter()
            .map(|(itag, url)| StreamDescriptor::with_url(itag, url))
            .collect();
        if streams.is_empty() {
            return self;
        }
        let dash = Self::from_streams(self.id.clone(), streams);
        merge(self, dash)
    }

    fn from_streams(id: VideoId, streams: impl IntoIterator<Item = StreamDescriptor>) -> Self {
        let mut record = Self::empty(id);
        for stream in streams {
            record.absorb_stream(stream);
        }
        record.recompute_expiration();
        record
    }
}

fn manifest_streams(manifest: &str) -> Result<Vec<StreamDescriptor>> {
    let variants = decode_manifest(manifest)?;
    Ok(variants
        .iter()
        .filter_map(|variant| {
            let stream = variant.to_stream();
            if stream.is_none() {
                tracing::debug!(uri = %variant.uri, "dropping manifest variant without itag");
            }
            stream
        })
        .collect())
}

fn decode_info(id: VideoId, fields: &QueryMap, options: &DecodeOptions) -> VideoRecord {
    let field = |key: &str| fields.get(key).map(String::as_str).filter(|v| !v.trim().is_empty());

    let mut thumbnails = field(options.thumbnail_key.as_str())
        .map(decode_thumbnail_list)
        .unwrap_or_default();
    thumbnails.extend(
        options
            .legacy_thumbnail_keys
            .iter()
            .filter_map(|key| field(key.as_str()))
            .map(|url| Thumbnail::without_size(url.trim())),
    );

    let mut streams: Vec<StreamDescriptor> = options
        .stream_map_keys
        .iter()
        .filter_map(|key| field(key.as_str()))
        .flat_map(|list| decode_stream_list(list, options))
        .collect();

    if let Some(payload) = field(options.streaming_data_key.as_str()) {
        streams.extend(decode_streaming_data(payload, options));
    }

    if let Some(manifest) = field(options.manifest_key.as_str()) {
        match manifest_streams(manifest) {
            Ok(found) => streams.extend(found),
            Err(e) => tracing::debug!(%id, error = %e, "ignoring inline manifest"),
        }
    }

    let mut record = VideoRecord::from_streams(id, streams);
    record.metadata = Metadata::from_fields(fields);
    record.thumbnails = thumbnails;
    record
}
