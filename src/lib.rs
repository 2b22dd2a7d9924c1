//! Tubeforge - resolve fetched video payloads into playable streams
//!
//! This library crate exposes the configuration layer for integration testing.
//! Decoding, merging and validation live in the `tf-*` crates.

pub mod config;
