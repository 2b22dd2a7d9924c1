//! Boundary to the external signature decoder.
//!
//! Deciphering a stream signature is a reverse-engineered routine that
//! changes whenever the remote player does, so it lives outside this crate.
//! Callers plug it in through [`SignatureDecoder`]; a plain closure works.

use tf_core::{Error, Itag, Result};
use tf_decode::{urls, CipherReference};

use crate::validate::ValidatedVideo;

/// Turns an enciphered signature into the value the stream URL expects.
///
/// Implementations must be `Send + Sync` so one decoder can serve
/// concurrent resolutions.
pub trait SignatureDecoder: Send + Sync {
    /// Decode `reference.signature`. The error string is reported back as
    /// [`Error::SignatureDecoding`].
    fn decode_signature(&self, reference: &CipherReference) -> std::result::Result<String, String>;
}

impl<F> SignatureDecoder for F
where
    F: Fn(&CipherReference) -> std::result::Result<String, String> + Send + Sync,
{
    fn decode_signature(&self, reference: &CipherReference) -> std::result::Result<String, String> {
        self(reference)
    }
}

impl ValidatedVideo {
    /// A URL for `itag` that can be requested as-is.
    ///
    /// Direct streams are returned unchanged and never reach the decoder.
    /// For cipher-pending streams the decoded signature is appended under the
    /// stream's signature parameter. Returns `None` for an unknown itag.
    pub fn playable_url<D>(&self, itag: Itag, decoder: &D) -> Option<Result<String>>
    where
        D: SignatureDecoder + ?Sized,
    {
        let stream = self.stream(itag)?;
        let url = stream.url.as_deref()?;

        if !stream.requires_cipher_decoding {
            return Some(Ok(url.to_string()));
        }

        let Some(reference) = stream.cipher.as_ref() else {
            return Some(Err(Error::CipherSignatureRequired { itag }));
        };

        let result = decoder
            .decode_signature(reference)
            .map(|signature| urls::append_query_param(url, &reference.signature_param, &signature))
            .map_err(|message| {
                tracing::warn!(%itag, %message, "signature decoding failed");
                Error::signature_decoding(itag, message)
            });
        Some(result)
    }
}
