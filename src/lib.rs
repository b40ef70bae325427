//! Incremental MD5 hashing over bytes, UTF-8, UTF-16 and ASCII text.
//!
//! See [`crypto::hash::md5`] for the engine and the one-shot helpers.

pub mod crypto;
pub mod utils;

pub use tachyon_md5_macros::*;
