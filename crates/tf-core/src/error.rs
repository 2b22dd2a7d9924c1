//! Unified error type for video resolution.
//!
//! Element-level decode problems never surface here: decoders drop the bad
//! element and carry on. What remains are structural failures of a whole
//! payload, a bad identifier, the terminal "nothing playable" outcome, and
//! the two kinds raised at the signature-decoding boundary. Orchestration
//! layers branch on [`Error::code`] or [`Error::is_retryable`] to decide
//! whether to re-fetch with a different client profile.

use std::fmt;

use crate::ids::{Itag, VideoId};

/// Stable code reported for a stream whose URL is unusable until its
/// signature has been decoded.
pub const CIPHER_SIGNATURE_REQUIRED_CODE: i32 = -1000;

/// Which wire payload a structural failure was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// URL-query-string encoded info payload.
    Info,
    /// Comma-separated thumbnail descriptors.
    ThumbnailList,
    /// Line-oriented playlist manifest.
    Manifest,
    /// Delimiter-separated list of query-encoded stream descriptors.
    StreamList,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayloadKind::Info => "info",
            PayloadKind::ThumbnailList => "thumbnail list",
            PayloadKind::Manifest => "manifest",
            PayloadKind::StreamList => "stream list",
        };
        f.write_str(s)
    }
}

/// Failure modes of decoding, constructing and validating a video record.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload as a whole could not be segmented.
    #[error("Malformed {payload} payload: {reason}")]
    MalformedPayload {
        /// The payload that failed to decode.
        payload: PayloadKind,
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// The video identifier was empty or blank.
    #[error("Invalid video identifier: {0:?}")]
    InvalidIdentifier(String),

    /// After every source was merged, no stream carries a URL.
    #[error("No playable streams for video {id}{}", reason_suffix(.reason))]
    NoPlayableStreams {
        /// The video the record was being built for.
        id: VideoId,
        /// Reason declared by the upstream service, when it gave one.
        reason: Option<String>,
    },

    /// The stream's URL needs its signature decoded before use.
    #[error("Stream {itag} requires cipher signature decoding")]
    CipherSignatureRequired {
        /// The stream awaiting decoding.
        itag: Itag,
    },

    /// The external signature decoder rejected a cipher reference.
    #[error("Signature decoding failed for stream {itag}: {message}")]
    SignatureDecoding {
        /// The stream whose signature could not be decoded.
        itag: Itag,
        /// Description supplied by the decoder.
        message: String,
    },
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(" ({r})"),
        None => String::new(),
    }
}

impl Error {
    /// Stable numeric code for this failure kind.
    pub fn code(&self) -> i32 {
        match self {
            Error::MalformedPayload { .. } => 1,
            Error::InvalidIdentifier(_) => 2,
            Error::NoPlayableStreams { .. } => 151,
            Error::CipherSignatureRequired { .. } => CIPHER_SIGNATURE_REQUIRED_CODE,
            Error::SignatureDecoding { .. } => -1001,
        }
    }

    /// Whether re-fetching with a different client profile may succeed.
    ///
    /// A malformed payload means the upstream encoding changed and code
    /// needs updating; retrying will not help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::NoPlayableStreams { .. } | Error::CipherSignatureRequired { .. }
        )
    }

    /// Convenience constructor for [`Error::MalformedPayload`].
    pub fn malformed(payload: PayloadKind, reason: impl Into<String>) -> Self {
        Error::MalformedPayload {
            payload,
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Error::NoPlayableStreams`].
    pub fn no_playable_streams(id: VideoId, reason: Option<String>) -> Self {
        Error::NoPlayableStreams { id, reason }
    }

    /// Convenience constructor for [`Error::SignatureDecoding`].
    pub fn signature_decoding(itag: Itag, message: impl fmt::Display) -> Self {
        Error::SignatureDecoding {
            itag,
            message: message.to_string(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
