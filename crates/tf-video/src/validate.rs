//! Validation & signal layer.
//!
//! [`validate`] is the last step of the lifecycle. It consumes a record and
//! either returns a [`ValidatedVideo`] or fails with
//! [`Error::NoPlayableStreams`]. A validated video only offers lookups:
//! there is no way to merge into it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tf_core::{Error, Itag, Result, VideoId};
use tf_decode::{StreamDescriptor, Thumbnail};

use crate::record::{earliest_expiry, Metadata, VideoRecord};

/// A record that passed validation: every stream carries a URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedVideo {
    id: VideoId,
    metadata: Metadata,
    thumbnails: Vec<Thumbnail>,
    streams: BTreeMap<Itag, StreamDescriptor>,
    expiration: Option<DateTime<Utc>>,
}

/// Streams split by whether they can be used as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamPartition<'a> {
    /// Streams whose URL can be requested directly.
    pub usable: Vec<&'a StreamDescriptor>,
    /// Streams whose signature must be decoded first.
    pub cipher_pending: Vec<&'a StreamDescriptor>,
}

/// Validate a fully merged record.
///
/// Descriptors left without a URL after all merges are discarded; if none
/// remain the record is dropped and [`Error::NoPlayableStreams`] returned,
/// carrying any reason the upstream service gave.
pub fn validate(record: VideoRecord) -> Result<ValidatedVideo> {
    let VideoRecord {
        id,
        metadata,
        thumbnails,
        streams,
        expiration: _,
    } = record;

    let streams: BTreeMap<Itag, StreamDescriptor> = streams
        .into_iter()
        .filter(|(itag, stream)| {
            let keep = stream.is_playable();
            if !keep {
                tracing::debug!(%id, %itag, "discarding stream without URL");
            }
            keep
        })
        .collect();

    if streams.is_empty() {
        tracing::info!(%id, reason = ?metadata.unavailable_reason, "no playable streams");
        return Err(Error::no_playable_streams(id, metadata.unavailable_reason));
    }

    let video = ValidatedVideo {
        expiration: earliest_expiry(streams.values()),
        id,
        metadata,
        thumbnails,
        streams,
    };
    tracing::info!(
        id = %video.id,
        usable = video.usable_streams().count(),
        cipher_pending = video.cipher_pending_streams().count(),
        "validated video"
    );
    Ok(video)
}

impl VideoRecord {
    /// Method form of [`validate`].
    pub fn validate(self) -> Result<ValidatedVideo> {
        validate(self)
    }
}

impl ValidatedVideo {
    pub fn id(&self) -> &VideoId {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    /// All streams keyed by itag. Never empty.
    pub fn streams(&self) -> &BTreeMap<Itag, StreamDescriptor> {
        &self.streams
    }

    pub fn stream(&self, itag: Itag) -> Option<&StreamDescriptor> {
        self.streams.get(&itag)
    }

    /// Minimum expiry hint across the streams, if any stream has one.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Streams usable without signature decoding, in itag order.
    pub fn usable_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.values().filter(|s| !s.requires_cipher_decoding)
    }

    /// Streams that must go through a signature decoder before use.
    pub fn cipher_pending_streams(&self) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.values().filter(|s| s.requires_cipher_decoding)
    }

    pub fn partition(&self) -> StreamPartition<'_> {
        let (cipher_pending, usable): (Vec<_>, Vec<_>) = self
            .streams
            .values()
            .partition(|s| s.requires_cipher_decoding);
        StreamPartition {
            usable,
            cipher_pending,
        }
    }

    /// First stream, in the caller's order of preference, that is present.
    pub fn preferred_stream(&self, preference: &[Itag]) -> Option<&StreamDescriptor> {
        preference.iter().find_map(|itag| self.streams.get(itag))
    }

    /// The directly usable URL of a stream.
    ///
    /// Returns `None` for an unknown itag and
    /// [`Error::CipherSignatureRequired`] for a stream awaiting signature
    /// decoding; see [`playable_url`](Self::playable_url) for those.
    pub fn url(&self, itag: Itag) -> Option<Result<&str>> {
        let stream = self.streams.get(&itag)?;
        Some(
            stream
                .direct_url()
                .ok_or(Error::CipherSignatureRequired { itag }),
        )
    }
}
