//! Incremental MD5 (RFC 1321).
//!
//! [`Md5`] absorbs raw bytes, UTF-8 text, UTF-16 code units or ASCII text
//! across any number of calls and produces a [`Digest`]. The free functions
//! below are one-shot shortcuts; each runs on its own engine, so they can be
//! called from any thread without coordination.
//!
//! MD5 is broken as a cryptographic hash. Use it for checksums and cache keys,
//! not for anything an attacker can choose the input of.

use log::{debug, error};

mod compress;
mod digest;
mod error;
pub mod soft;

pub(crate) use compress::compress;
pub use digest::Digest;
pub use error::EncodingError;
pub use soft::Md5;

const INITIAL_STATE: [u32; 4] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476];

/// K64[i] = floor(2^32 * |sin(i + 1)|)
const K64: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

const SELF_CHECK_INPUT: &str = "hello";
const SELF_CHECK_DIGEST: &str = "5d41402abc4b2a76b9719d911017c592";

/// Digest of the UTF-8 encoding of `text`.
#[inline]
pub fn hash_text(text: &str) -> Digest {
    Md5::new().append_text(text).finalize()
}

/// Digest of `text` taken one byte per character.
///
/// Characters outside `0..256` are truncated to their low byte; see
/// [`Md5::append_ascii_text`].
#[inline]
pub fn hash_ascii_text(text: &str) -> Digest {
    Md5::new().append_ascii_text(text).finalize()
}

/// Digest of UTF-16 text after re-encoding it as UTF-8.
#[inline]
pub fn hash_utf16(units: &[u16]) -> Result<Digest, EncodingError> {
    Ok(Md5::new().append_utf16(units)?.finalize())
}

#[inline]
pub fn hash_bytes(data: &[u8]) -> Digest {
    Md5::new().append_bytes(data).finalize()
}

/// Hashes a fixed message and compares it against its published digest.
///
/// Meant as a startup diagnostic for embedders; nothing in this crate runs it
/// implicitly.
pub fn self_check() -> bool {
    let digest = hash_text(SELF_CHECK_INPUT).to_hex();
    if digest == SELF_CHECK_DIGEST {
        debug!("md5 self-check passed");
        true
    } else {
        error!(
            "md5 self-check failed: expected {}, got {}",
            SELF_CHECK_DIGEST, digest
        );
        false
    }
}
