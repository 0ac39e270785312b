//! I/O utilities
//!
//! This module provides payload transport decoding and the seekable reader
//! trait used for in-memory containers.

pub mod seekable;
pub mod payload;

pub use payload::{Payload, PayloadEncoding, DEFAULT_FILENAME};
