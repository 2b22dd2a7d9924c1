//! Merge engine: folds a supplemental record into a base record.
//!
//! The rules, field by field:
//!
//! | Part | Rule |
//! |---|---|
//! | identifier | base is kept |
//! | scalar metadata | supplemental overwrites when present |
//! | thumbnails | supplemental appended after base, no de-duplication |
//! | streams, itag in both | per field, supplemental overwrites when present |
//! | stream expiry | follows whichever URL the merged stream keeps |
//! | `requires_cipher_decoding` | OR of both sides |
//! | streams, itag in one side | passed through |
//! | expiration | recomputed from the merged streams |
//!
//! The stream set of the result is the union of both inputs' itags, so
//! `merge(a, b)` and `merge(b, a)` cover the same itags; on conflicting
//! values the second argument wins.

use tf_decode::{urls, StreamDescriptor};

use crate::record::{Metadata, VideoRecord};

/// Merge `supplemental` into `base`, returning the combined record.
///
/// Never fails. A result without streams is left for the caller to judge.
pub fn merge(base: VideoRecord, supplemental: VideoRecord) -> VideoRecord {
    if base.id != supplemental.id {
        tracing::warn!(
            base = %base.id,
            supplemental = %supplemental.id,
            "merging records for different videos; keeping base identifier"
        );
    }

    let VideoRecord {
        id: _,
        metadata,
        thumbnails,
        streams,
        expiration: _,
    } = supplemental;

    let mut merged = base;
    merge_metadata(&mut merged.metadata, metadata);
    merged.thumbnails.extend(thumbnails);
    for stream in streams.into_values() {
        merged.absorb_stream(stream);
    }
    merged.recompute_expiration();

    tracing::debug!(
        id = %merged.id,
        streams = merged.streams.len(),
        thumbnails = merged.thumbnails.len(),
        "merged supplemental record"
    );
    merged
}

impl VideoRecord {
    /// Method form of [`merge`]: `self` is the base.
    #[must_use]
    pub fn merge(self, supplemental: VideoRecord) -> VideoRecord {
        merge(self, supplemental)
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn merge_metadata(base: &mut Metadata, supplemental: Metadata) {
    let Metadata {
        title,
        author,
        channel_id,
        description,
        duration,
        upload_date,
        view_count,
        is_live,
        live_stream_url,
        dash_manifest_url,
        unavailable_reason,
    } = supplemental;

    overwrite(&mut base.title, title);
    overwrite(&mut base.author, author);
    overwrite(&mut base.channel_id, channel_id);
    overwrite(&mut base.description, description);
    overwrite(&mut base.duration, duration);
    overwrite(&mut base.upload_date, upload_date);
    overwrite(&mut base.view_count, view_count);
    overwrite(&mut base.is_live, is_live);
    overwrite(&mut base.live_stream_url, live_stream_url);
    overwrite(&mut base.dash_manifest_url, dash_manifest_url);
    overwrite(&mut base.unavailable_reason, unavailable_reason);
}

/// Fold `supplemental` into `base`, which describe the same itag.
pub(crate) fn merge_stream(base: &mut StreamDescriptor, supplemental: StreamDescriptor) {
    let StreamDescriptor {
        itag: _,
        url,
        cipher,
        mime_type,
        codecs,
        quality_label,
        bitrate,
        resolution,
        fps,
        content_length,
        expires_at: _,
        requires_cipher_decoding,
    } = supplemental;

    // The expiry hint belongs to the URL it was parsed from.
    if let Some(url) = url {
        base.expires_at = urls::expiry_hint(&url);
        base.url = Some(url);
    }
    overwrite(&mut base.cipher, cipher);
    overwrite(&mut base.mime_type, mime_type);
    overwrite(&mut base.codecs, codecs);
    overwrite(&mut base.quality_label, quality_label);
    overwrite(&mut base.bitrate, bitrate);
    overwrite(&mut base.resolution, resolution);
    overwrite(&mut base.fps, fps);
    overwrite(&mut base.content_length, content_length);
    // Never cleared here; clearing belongs to the signature decoder.
    base.requires_cipher_decoding |= requires_cipher_decoding;
}
