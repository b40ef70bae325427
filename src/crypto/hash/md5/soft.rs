use log::{debug, trace};

use super::{compress, Digest, EncodingError};

/// Incremental MD5 hasher.
///
/// Input is staged in a fixed 64-byte buffer; every time it fills, the block is
/// compressed into the state, so at most 63 bytes are held between calls. All
/// `append_*` methods return `&mut Self` for chaining:
///
/// ```
/// use tachyon_md5::crypto::hash::md5::Md5;
///
/// let digest = Md5::new()
///     .append_text("hel")
///     .append_bytes(b"lo")
///     .finalize();
/// assert_eq!(digest.to_hex(), "5d41402abc4b2a76b9719d911017c592");
/// ```
///
/// [`finalize`](Self::finalize) pads the message in place and is not
/// idempotent; call [`start`](Self::start) before hashing another message with
/// the same instance.
#[derive(Clone, Copy, Debug)]
pub struct Md5 {
    state: [u32; 4],
    buffer: [u8; Self::BLOCK_LEN],
    len: u64,
    offset: usize,
}

impl Md5 {
    pub const BLOCK_LEN: usize = 64;
    pub const DIGEST_LEN: usize = 16;

    const MLEN_SIZE: usize = core::mem::size_of::<u64>();
    const MLEN_OFFSET: usize = Self::BLOCK_LEN - Self::MLEN_SIZE;

    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            state: super::INITIAL_STATE,
            buffer: [0; Self::BLOCK_LEN],
            len: 0,
            offset: 0,
        }
    }

    /// Resets to the empty message, discarding any buffered input.
    #[inline]
    pub fn start(&mut self) -> &mut Self {
        self.state = super::INITIAL_STATE;
        self.len = 0;
        self.offset = 0;
        self
    }

    #[inline]
    pub fn append_bytes(&mut self, data: &[u8]) -> &mut Self {
        let mut data = data;

        if self.offset > 0 {
            let take = (Self::BLOCK_LEN - self.offset).min(data.len());
            self.buffer[self.offset..self.offset + take].copy_from_slice(&data[..take]);
            self.offset += take;
            data = &data[take..];
            if self.offset < Self::BLOCK_LEN {
                return self;
            }
            self.drain();
        }

        let mut blocks = data.chunks_exact(Self::BLOCK_LEN);
        for block in &mut blocks {
            // SAFETY: chunks_exact yields exactly BLOCK_LEN bytes
            compress(&mut self.state, unsafe { crate::utils::slice_to_array(block) });
            self.len += Self::BLOCK_LEN as u64;
        }

        let remain = blocks.remainder();
        self.buffer[..remain.len()].copy_from_slice(remain);
        self.offset = remain.len();
        self
    }

    /// Appends the UTF-8 encoding of `text`.
    #[inline]
    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.append_bytes(text.as_bytes())
    }

    /// Appends UTF-16 text re-encoded as UTF-8.
    ///
    /// Surrogate pairs are combined into one code point (four UTF-8 bytes). A
    /// high surrogate that is not followed by a low surrogate fails with
    /// [`EncodingError`]; whatever precedes it has already been absorbed and
    /// stays absorbed. A low surrogate on its own is encoded like any other
    /// BMP code unit, as three bytes.
    pub fn append_utf16(&mut self, units: &[u16]) -> Result<&mut Self, EncodingError> {
        let mut index = 0usize;
        while index < units.len() {
            let unit = units[index];
            let code = match unit {
                0xD800..=0xDBFF => match units.get(index + 1) {
                    Some(&low @ 0xDC00..=0xDFFF) => {
                        index += 1;
                        0x10000 + ((unit as u32 - 0xD800) << 10) + (low as u32 - 0xDC00)
                    }
                    _ => {
                        let err = EncodingError { index, unit };
                        debug!("rejecting utf-16 input: {}", err);
                        return Err(err);
                    }
                },
                _ => unit as u32,
            };
            self.push_code_point(code);
            index += 1;
        }
        Ok(self)
    }

    /// Appends one byte per character of `text`.
    ///
    /// The caller guarantees every character is below U+0100. Larger code
    /// points are not rejected; only their low byte is hashed, so the digest
    /// then differs from [`append_text`](Self::append_text).
    pub fn append_ascii_text(&mut self, text: &str) -> &mut Self {
        if text.is_ascii() {
            return self.append_bytes(text.as_bytes());
        }
        for ch in text.chars() {
            self.push_byte(ch as u32 as u8);
        }
        self
    }

    /// Pads the message, encodes its bit length and returns the digest.
    ///
    /// The buffer is overwritten by the padding, so calling this twice without
    /// [`start`](Self::start) in between yields a digest of nothing in
    /// particular.
    pub fn finalize(&mut self) -> Digest {
        let offset = self.offset;
        self.len += offset as u64;

        self.buffer[offset] = 0x80;
        self.buffer[offset + 1..].fill(0);
        if offset >= Self::MLEN_OFFSET {
            compress(&mut self.state, &self.buffer);
            self.buffer.fill(0);
        }

        let [lo, hi] = Self::bit_len_words(self.len);
        self.buffer[Self::MLEN_OFFSET..Self::MLEN_OFFSET + 4].copy_from_slice(&lo.to_le_bytes());
        self.buffer[Self::MLEN_OFFSET + 4..].copy_from_slice(&hi.to_le_bytes());
        compress(&mut self.state, &self.buffer);

        trace!("md5 finalized {} bytes", self.len);
        Digest::from_words(self.state)
    }

    /// [`finalize`](Self::finalize) rendered as 32 lowercase hex digits.
    #[inline]
    pub fn finalize_hex(&mut self) -> String {
        self.finalize().to_hex()
    }

    /// [`finalize`](Self::finalize) as the raw state words.
    #[inline]
    pub fn finalize_raw(&mut self) -> [u32; 4] {
        self.finalize().words()
    }

    #[inline(always)]
    pub fn oneshot<T: AsRef<[u8]>>(data: T) -> [u8; Self::DIGEST_LEN] {
        Self::new().append_bytes(data.as_ref()).finalize().to_bytes()
    }

    /// Message length in bits (mod 2^64), split into the low and high words
    /// that fill the last eight bytes of the final block.
    #[inline(always)]
    fn bit_len_words(len: u64) -> [u32; 2] {
        let bits = len.wrapping_mul(8);
        [bits as u32, (bits >> 32) as u32]
    }

    /// UTF-8 length-prefix encoding of `code`, which is at most 0x10FFFF.
    /// Surrogate values take the three-byte form.
    #[inline(always)]
    fn push_code_point(&mut self, code: u32) {
        if code < 0x80 {
            self.push_byte(code as u8);
        } else if code < 0x800 {
            self.push_byte(0xC0 | (code >> 6) as u8);
            self.push_byte(0x80 | (code & 0x3F) as u8);
        } else if code < 0x10000 {
            self.push_byte(0xE0 | (code >> 12) as u8);
            self.push_byte(0x80 | (code >> 6 & 0x3F) as u8);
            self.push_byte(0x80 | (code & 0x3F) as u8);
        } else {
            self.push_byte(0xF0 | (code >> 18) as u8);
            self.push_byte(0x80 | (code >> 12 & 0x3F) as u8);
            self.push_byte(0x80 | (code >> 6 & 0x3F) as u8);
            self.push_byte(0x80 | (code & 0x3F) as u8);
        }
    }

    #[inline(always)]
    fn push_byte(&mut self, byte: u8) {
        self.buffer[self.offset] = byte;
        self.offset += 1;
        if self.offset == Self::BLOCK_LEN {
            self.drain();
        }
    }

    #[inline(never)]
    fn drain(&mut self) {
        compress(&mut self.state, &self.buffer);
        self.len += Self::BLOCK_LEN as u64;
        self.offset = 0;
    }
}

impl Default for Md5 {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Lets a caller `io::copy` any reader it owns into the hasher.
impl std::io::Write for Md5 {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.append_bytes(buf);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|_| rand::random::<u8>()).collect()
    }

    #[test]
    fn test_md5() {
        assert_eq!(
            Md5::oneshot(b""),
            [
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04,
                0xe9, 0x80, 0x09, 0x98, 0xec, 0xf8, 0x42, 0x7e
            ],
        );
        assert_eq!(
            Md5::oneshot(b"hello world"),
            [
                0x5e, 0xb6, 0x3b, 0xbb, 0xe0, 0x1e, 0xee, 0xd0,
                0x93, 0xcb, 0x22, 0xbb, 0x8f, 0x5a, 0xcd, 0xc3,
            ],
        );
        let random_data = random_bytes(1000);
        for _ in 0..100 {
            let length = (rand::random::<u32>() % 1000) as usize;
            let data = &random_data[..length];
            assert_eq!(
                Md5::oneshot(data),
                md5::compute(data).0,
                "Failed for data length: {}",
                length
            );
        }
    }

    #[test]
    fn test_incremental_partitions() {
        let data = random_bytes(777);
        let expected = md5::compute(&data).0;

        for _ in 0..100 {
            let mut md5 = Md5::new();
            let mut rest = &data[..];
            while !rest.is_empty() {
                let take = (rand::random::<u32>() as usize % 150).min(rest.len());
                md5.append_bytes(&rest[..take]);
                assert!(md5.offset < Md5::BLOCK_LEN);
                rest = &rest[take..];
            }
            assert_eq!(md5.finalize().to_bytes(), expected);
        }

        let mut md5 = Md5::new();
        for byte in &data {
            md5.append_bytes(core::slice::from_ref(byte));
        }
        assert_eq!(md5.finalize().to_bytes(), expected);
    }

    #[test]
    fn test_padding_boundaries() {
        // 55 fits the length in the same block, 56 and up spill into another
        for length in [0, 1, 54, 55, 56, 57, 63, 64, 65, 119, 120, 128] {
            let data = vec![b'a'; length];
            assert_eq!(
                Md5::new().append_bytes(&data).finalize().to_bytes(),
                md5::compute(&data).0,
                "Failed for data length: {}",
                length
            );
        }
        assert_eq!(
            Md5::new().append_bytes(&[b'a'; 55]).finalize_hex(),
            "ef1772b6dff9a122358552954ad0df65"
        );
        assert_eq!(
            Md5::new().append_bytes(&[b'a'; 56]).finalize_hex(),
            "3b0c8ac703f828b04c6c197006d17218"
        );
        assert_eq!(
            Md5::new().append_bytes(&[b'a'; 64]).finalize_hex(),
            "014842d480b571495a4a0363793f7367"
        );
    }

    #[test]
    fn test_raw_and_hex_agree() {
        let data = random_bytes(300);
        let mut first = Md5::new();
        first.append_bytes(&data);
        let mut second = first;

        let raw = first.finalize_raw();
        let rendered: String = raw.iter().map(|word| hex::encode(word.to_le_bytes())).collect();
        assert_eq!(rendered, second.finalize_hex());
    }

    #[test]
    fn test_utf16_matches_utf8_bytes() {
        let text = "naïve café ☕ 𝄞 music 😋 ∑";
        let units: Vec<u16> = text.encode_utf16().collect();
        assert!(units.iter().any(|unit| (0xD800..0xDC00).contains(unit)));

        let mut md5 = Md5::new();
        md5.append_utf16(&units).unwrap();
        assert_eq!(md5.finalize().to_bytes(), md5::compute(text.as_bytes()).0);

        assert_eq!(
            Md5::new().append_text(text).finalize(),
            Md5::new().append_bytes(text.as_bytes()).finalize()
        );
    }

    #[test]
    fn test_utf16_across_block_boundary() {
        // 62 ASCII units then a 4-byte code point straddling the first block
        let text = format!("{}😋{}", "x".repeat(62), "y".repeat(70));
        let units: Vec<u16> = text.encode_utf16().collect();

        let mut md5 = Md5::new();
        md5.append_utf16(&units).unwrap();
        assert_eq!(md5.len, 128);
        assert_eq!(md5.offset, text.len() - 128);
        assert_eq!(md5.finalize().to_bytes(), md5::compute(text.as_bytes()).0);
    }

    #[test]
    fn test_utf16_unpaired_surrogate() {
        let mut md5 = Md5::new();
        let units = [b'a' as u16, b'b' as u16, 0xD83D, b'z' as u16];
        assert_eq!(
            md5.append_utf16(&units).err(),
            Some(EncodingError { index: 2, unit: 0xD83D })
        );
        // bytes before the bad unit stay absorbed
        md5.append_text("c");
        assert_eq!(md5.finalize(), super::super::hash_text("abc"));

        let err = Md5::new().append_utf16(&[0xD83D]).err();
        assert_eq!(err, Some(EncodingError { index: 0, unit: 0xD83D }));

        let err = Md5::new().append_utf16(&[0xD83D, 0xD83D, 0xDE0B]).err();
        assert_eq!(err, Some(EncodingError { index: 0, unit: 0xD83D }));

        let err = Md5::new()
            .append_utf16(&[0xD83D, 0xDE0B, 0xDBFF, 0xDBFF])
            .err();
        assert_eq!(err, Some(EncodingError { index: 2, unit: 0xDBFF }));
        assert_eq!(
            err.map(|err| err.to_string()).as_deref(),
            Some("unpaired surrogate 0xdbff at code unit 2")
        );
    }

    #[test]
    fn test_utf16_lone_low_surrogate() {
        // a low surrogate with no high surrogate before it takes the 3-byte form
        let mut md5 = Md5::new();
        md5.append_utf16(&[0x61, 0xDC00]).unwrap();
        assert_eq!(
            md5.finalize(),
            Md5::new().append_bytes(&[0x61, 0xED, 0xB0, 0x80]).finalize()
        );

        let mut md5 = Md5::new();
        md5.append_utf16(&[0xDE0B, 0x00E9, 0xDFFF]).unwrap();
        assert_eq!(
            md5.finalize().to_bytes(),
            md5::compute([0xED, 0xB8, 0x8B, 0xC3, 0xA9, 0xED, 0xBF, 0xBF]).0
        );

        // a low surrogate after a completed pair is lone as well
        let mut md5 = Md5::new();
        md5.append_utf16(&[0xD83D, 0xDE0B, 0xDE0B]).unwrap();
        assert_eq!(
            md5.finalize().to_bytes(),
            md5::compute([0xF0, 0x9F, 0x98, 0x8B, 0xED, 0xB8, 0x8B]).0
        );
    }

    #[test]
    fn test_ascii_matches_text() {
        let printable: String = (0u8..128).map(char::from).collect();
        for text in ["", "hello", "The quick brown fox", printable.as_str()] {
            assert_eq!(
                Md5::new().append_ascii_text(text).finalize(),
                Md5::new().append_text(text).finalize()
            );
        }
    }

    #[test]
    fn test_ascii_truncates_to_low_byte() {
        // U+00E9 is one byte here, two bytes through append_text
        assert_eq!(
            Md5::new().append_ascii_text("caf\u{e9}").finalize().to_bytes(),
            md5::compute([b'c', b'a', b'f', 0xE9]).0
        );
        // U+0141 keeps only 0x41
        assert_eq!(
            Md5::new().append_ascii_text("\u{141}").finalize(),
            Md5::new().append_bytes(b"A").finalize()
        );
    }

    #[test]
    fn test_bit_length_beyond_32_bits() {
        assert_eq!(Md5::bit_len_words(0), [0, 0]);
        assert_eq!(Md5::bit_len_words(0x1fff_ffff), [0xffff_fff8, 0]);
        assert_eq!(Md5::bit_len_words(0x2000_0000), [0, 1]);
        assert_eq!(Md5::bit_len_words(0x2000_0004), [0x20, 1]);
        assert_eq!(Md5::bit_len_words(0x1_2345_6789), [0x1a2b_3c48, 0x9]);

        let mut md5 = Md5::new();
        md5.append_bytes(b"tail");
        md5.len = 0x2000_0000;

        let mut expected = md5.state;
        let mut block = [0u8; 64];
        block[..4].copy_from_slice(b"tail");
        block[4] = 0x80;
        let bits = (0x2000_0000u64 + 4) * 8;
        block[56..].copy_from_slice(&bits.to_le_bytes());
        compress(&mut expected, &block);

        assert_eq!(md5.finalize().words(), expected);
    }

    #[test]
    fn test_start_after_finalize() {
        let mut md5 = Md5::new();
        md5.append_text("some earlier message that spans more than one block of input .....");
        let _ = md5.finalize();

        let digest = md5.start().append_text("hello").finalize_hex();
        assert_eq!(digest, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(md5.start().finalize_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_debug_shows_state() {
        let mut md5 = Md5::new();
        md5.append_bytes(b"abc");
        let shown = format!("{:?}", md5);
        assert!(shown.starts_with("Md5 {"));
        assert!(shown.contains("offset: 3"));
        assert!(shown.contains("len: 0"));
    }

    #[test]
    fn test_io_write() {
        use std::io::Write;

        let data = random_bytes(5000);
        let mut md5 = Md5::default();
        std::io::copy(&mut &data[..], &mut md5).unwrap();
        md5.flush().unwrap();
        assert_eq!(md5.finalize().to_bytes(), md5::compute(&data).0);
    }
}
