//! tf-decode: pure decoders for the wire encodings describing a video.
//!
//! Four independent decoders turn strings handed over by an external fetch
//! into structured values:
//!
//! - [`query`] - `key=value&key=value` blobs to a mapping, and back
//! - [`thumbnails`] - comma-separated thumbnail descriptors
//! - [`manifest`] - line-oriented HLS master playlists
//! - [`streams`] - lists of query-encoded stream descriptors
//!
//! None of them perform I/O. Malformed elements inside an otherwise
//! well-formed payload are dropped (and logged at `debug`); only a payload
//! that cannot be segmented at all is reported as
//! [`Error::MalformedPayload`](tf_core::Error::MalformedPayload).
//!
//! # Quick start
//!
//! ```
//! use tf_decode::{decode_query_string, decode_thumbnail_list};
//!
//! let info = decode_query_string("title=Test+Video&thumbnail_url=http%3A%2F%2Fx%2Fa.jpg,120,90");
//! assert_eq!(info["title"], "Test Video");
//!
//! let thumbs = decode_thumbnail_list(&info["thumbnail_url"]);
//! assert_eq!(thumbs[0].url, "http://x/a.jpg");
//! assert_eq!((thumbs[0].width, thumbs[0].height), (120, 90));
//! ```

pub mod manifest;
pub mod query;
pub mod streams;
pub mod thumbnails;
pub mod types;
pub mod urls;

pub use manifest::{decode_manifest, ManifestVariant};
pub use query::{decode_query_string, encode_query_string, QueryMap};
pub use streams::{decode_stream_list, decode_streaming_data};
pub use thumbnails::decode_thumbnail_list;
pub use types::{CipherReference, StreamDescriptor, Thumbnail};
