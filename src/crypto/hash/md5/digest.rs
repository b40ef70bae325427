use core::fmt;

/// A finished MD5 digest.
///
/// Holds the four state words as the compression function leaves them. The
/// canonical byte order serializes each word little-endian, which is also the
/// order of the hex rendering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Digest([u32; 4]);

impl Digest {
    pub const LEN: usize = 16;
    pub const HEX_LEN: usize = Self::LEN * 2;

    #[inline(always)]
    pub const fn from_words(words: [u32; 4]) -> Self {
        Self(words)
    }

    /// The raw accumulator words A, B, C, D.
    #[inline(always)]
    pub const fn words(&self) -> [u32; 4] {
        self.0
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut output = [0u8; Self::LEN];
        for (chunk, word) in output.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        output
    }

    /// 32 lowercase hex digits.
    #[inline]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl From<Digest> for [u8; Digest::LEN] {
    #[inline]
    fn from(digest: Digest) -> Self {
        digest.to_bytes()
    }
}

impl From<Digest> for [u32; 4] {
    #[inline]
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}
