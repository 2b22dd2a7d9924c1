//! # tf-video
//!
//! Turns the raw payloads describing one remote video into a single,
//! validated description of its playable streams.
//!
//! A record moves through a fixed lifecycle:
//!
//! 1. [`VideoRecord::construct`] decodes the info payload (the Constructed state).
//! 2. [`merge()`] folds in supplemental records built from manifests,
//!    streaming-data payloads or DASH URL maps, returning a fresh record each
//!    time (the Merged state, any number of times).
//! 3. [`validate()`] consumes the record and yields either a
//!    [`ValidatedVideo`], which accepts no further merges, or
//!    [`Error::NoPlayableStreams`](tf_core::Error::NoPlayableStreams).
//!
//! [`resolve()`] runs the whole sequence over a set of [`Payloads`].
//!
//! ## Quick start
//!
//! ```
//! use tf_video::{merge, validate, VideoRecord};
//!
//! let base = VideoRecord::construct(
//!     "abc123",
//!     "title=Test+Video&url_encoded_fmt_stream_map=itag%3D18%26url%3Dhttps%253A%252F%252Fr1.example%252Fv",
//! )
//! .unwrap();
//! let manifest = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=640000\nhttps://m.example/itag/93/index.m3u8\n";
//! let extra = VideoRecord::from_manifest("abc123", manifest).unwrap();
//!
//! let video = validate(merge(base, extra)).unwrap();
//! assert_eq!(video.metadata().title.as_deref(), Some("Test Video"));
//! assert_eq!(video.usable_streams().count(), 2);
//! ```
//!
//! Nothing in this crate performs I/O or keeps shared state, so every
//! operation can run concurrently on independent inputs.

pub mod cipher;
mod construct;
pub mod merge;
pub mod record;
pub mod resolve;
pub mod validate;

pub use cipher::SignatureDecoder;
pub use merge::merge;
pub use record::{Metadata, VideoRecord};
pub use resolve::{resolve, resolve_with, Payloads};
pub use tf_decode::{CipherReference, StreamDescriptor, Thumbnail};
pub use validate::{validate, StreamPartition, ValidatedVideo};
