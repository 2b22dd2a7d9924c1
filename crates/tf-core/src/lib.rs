//! tf-core: shared errors, identifiers and decode options.
//!
//! This crate is the foundational dependency for the other tf-* crates. It
//! owns the failure taxonomy every stage of video resolution reports through,
//! the typed identifiers used to key records and streams, and the
//! [`DecodeOptions`] naming the wire keys the decoders look for.

pub mod error;
pub mod ids;
pub mod options;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, PayloadKind, Result, CIPHER_SIGNATURE_REQUIRED_CODE};
pub use ids::{Itag, VideoId};
pub use options::DecodeOptions;
