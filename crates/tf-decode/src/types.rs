//! Output types shared by the decoders and the video record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tf_core::Itag;

/// A thumbnail image. Width and height of `0` mean the source gave no size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    /// Create a thumbnail with known dimensions.
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// Create a thumbnail whose dimensions the source did not declare.
    pub fn without_size(url: impl Into<String>) -> Self {
        Self::new(url, 0, 0)
    }
}

/// The opaque reference handed to an external signature decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CipherReference {
    /// The enciphered signature, exactly as received.
    pub signature: String,
    /// Query parameter the decoded signature must be sent under.
    pub signature_param: String,
}

/// One candidate stream of a video, keyed by its [`Itag`].
///
/// Every field except the itag and the cipher flag is optional: a source may
/// describe only part of a stream and rely on another source for the rest.
/// When `requires_cipher_decoding` is set, `url` is a base URL that becomes
/// usable only once the signature in `cipher` has been decoded and appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub itag: Itag,
    pub url: Option<String>,
    pub cipher: Option<CipherReference>,
    /// Bare mime type, e.g. `video/mp4`.
    pub mime_type: Option<String>,
    /// Codec list from the mime type's `codecs` parameter.
    pub codecs: Option<String>,
    /// Human-readable quality, e.g. `720p` or `medium`.
    pub quality_label: Option<String>,
    /// Bits per second.
    pub bitrate: Option<u64>,
    /// (width, height) in pixels.
    pub resolution: Option<(u32, u32)>,
    pub fps: Option<u32>,
    /// Size of the stream in bytes.
    pub content_length: Option<u64>,
    /// Expiry hint parsed from the URL.
    pub expires_at: Option<DateTime<Utc>>,
    pub requires_cipher_decoding: bool,
}

impl StreamDescriptor {
    /// Create a descriptor carrying only its itag.
    pub fn new(itag: Itag) -> Self {
        Self {
            itag,
            url: None,
            cipher: None,
            mime_type: None,
            codecs: None,
            quality_label: None,
            bitrate: None,
            resolution: None,
            fps: None,
            content_length: None,
            expires_at: None,
            requires_cipher_decoding: false,
        }
    }

    /// Create a descriptor with a directly usable URL.
    pub fn with_url(itag: Itag, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            expires_at: crate::urls::expiry_hint(&url),
            url: Some(url),
            ..Self::new(itag)
        }
    }

    /// Whether the stream carries a URL, usable directly or after decoding.
    pub fn is_playable(&self) -> bool {
        self.url.is_some()
    }

    /// The URL, if it can be used without signature decoding.
    pub fn direct_url(&self) -> Option<&str> {
        if self.requires_cipher_decoding {
            None
        } else {
            self.url.as_deref()
        }
    }

    /// Whether the mime type declares an audio-only stream.
    pub fn is_audio_only(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("audio/"))
    }
}
