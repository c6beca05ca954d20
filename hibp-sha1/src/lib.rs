//! Dependency-free SHA-1 for k-anonymity password lookups.
//!
//! The digest is computed over a re-encoded form of the input text: `\r\n`
//! line endings are normalised to `\n`, then every UTF-16 code unit is expanded
//! into one, two or three bytes using the UTF-8 bit patterns. For any text made
//! of characters in the Basic Multilingual Plane this is exactly the UTF-8
//! encoding, so the result matches the hashes published by Pwned Passwords.
//!
//! Characters above U+FFFF are encoded one surrogate half at a time (three
//! bytes each), which is what browser-side breach checkers hash as well.
//!
//! ```
//! assert_eq!(hibp_sha1::digest("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
//! ```

use std::fmt;

/// Initial values of the five working registers.
pub const INITIAL_STATE: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// Additive constants for the four 20-round stages.
pub const ROUND_CONSTANTS: [u32; 4] = [0x5A827999, 0x6ED9EBA1, 0x8F1BBCDC, 0xCA62C1D6];

/// Number of 32-bit words in a compression block (512 bits).
pub const BLOCK_WORDS: usize = 16;

/// Length of a hex encoded digest.
pub const DIGEST_HEX_LEN: usize = 40;

/// Hex lookup table for lowercase output.
pub const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// A 160-bit SHA-1 digest, stored as the five final register values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha1Digest([u32; 5]);

impl Sha1Digest {
    /// Builds a digest from raw register values.
    pub const fn from_words(words: [u32; 5]) -> Self {
        Self(words)
    }

    pub const fn words(&self) -> [u32; 5] {
        self.0
    }

    /// Returns the digest as 20 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Returns the 40-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(DIGEST_HEX_LEN);
        for byte in self.to_bytes() {
            out.push(HEX_CHARS[(byte >> 4) as usize] as char);
            out.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
        }
        out
    }

    /// Returns the 40-character uppercase hex form used by the range API.
    pub fn to_hex_upper(&self) -> String {
        let mut out = self.to_hex();
        out.make_ascii_uppercase();
        out
    }
}

impl fmt::LowerHex for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0 {
            write!(f, "{word:08x}")?;
        }
        Ok(())
    }
}

impl fmt::UpperHex for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0 {
            write!(f, "{word:08X}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

/// Computes the digest of `text` and returns it as 40 lowercase hex characters.
pub fn digest(text: &str) -> String {
    digest_words(text).to_hex()
}

/// Computes the digest of `text` after re-encoding it with [`encode_message`].
pub fn digest_words(text: &str) -> Sha1Digest {
    digest_bytes(&encode_message(text))
}

/// Standard SHA-1 over raw bytes, with no text preprocessing.
pub fn digest_bytes(bytes: &[u8]) -> Sha1Digest {
    let words = pad_message(bytes);
    let mut state = INITIAL_STATE;

    for block in words.chunks_exact(BLOCK_WORDS) {
        // pad_message always yields a multiple of BLOCK_WORDS
        let mut buf = [0u32; BLOCK_WORDS];
        buf.copy_from_slice(block);
        compress(&mut state, &buf);
    }

    Sha1Digest(state)
}

/// Re-encodes text into the byte sequence that gets hashed.
///
/// `\r\n` becomes `\n`. Each UTF-16 code unit then maps to:
///
/// - one byte for values up to 0x7F
/// - two bytes (`110xxxxx 10xxxxxx`) for 0x80..=0x7FF
/// - three bytes (`1110xxxx 10xxxxxx 10xxxxxx`) for everything else
pub fn encode_message(text: &str) -> Vec<u8> {
    let normalized = text.replace("\r\n", "\n");
    let mut out = Vec::with_capacity(normalized.len());

    for unit in normalized.encode_utf16() {
        let c = u32::from(unit);
        if c < 0x80 {
            out.push(c as u8);
        } else if c < 0x800 {
            out.push(((c >> 6) | 0xC0) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        } else {
            out.push(((c >> 12) | 0xE0) as u8);
            out.push((((c >> 6) & 0x3F) | 0x80) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        }
    }

    out
}

/// Packs a message into big-endian words and applies SHA-1 padding.
///
/// The result always has a length that is a multiple of [`BLOCK_WORDS`]: the
/// message words, a word carrying the trailing 0-3 bytes plus the `1` bit,
/// zero words up to 14 mod 16, then the bit length as high and low words.
pub fn pad_message(bytes: &[u8]) -> Vec<u32> {
    let mut words = Vec::with_capacity((bytes.len() / 4 + 3).next_multiple_of(BLOCK_WORDS));

    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        words.push(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    let rem = chunks.remainder();
    let mut last = [0u8; 4];
    last[..rem.len()].copy_from_slice(rem);
    last[rem.len()] = 0x80;
    words.push(u32::from_be_bytes(last));

    while words.len() % BLOCK_WORDS != 14 {
        words.push(0);
    }

    // Bit length wraps past 2^64 bits.
    let bit_len = (bytes.len() as u64).wrapping_mul(8);
    words.push((bit_len >> 32) as u32);
    words.push(bit_len as u32);

    words
}

/// Runs the 80-round compression function over one block and accumulates
/// the result into `state`.
pub fn compress(state: &mut [u32; 5], block: &[u32; BLOCK_WORDS]) {
    let mut w = [0u32; 80];
    w[..BLOCK_WORDS].copy_from_slice(block);
    for i in BLOCK_WORDS..80 {
        w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (i, &word) in w.iter().enumerate() {
        let f = match i {
            0..=19 => (b & c) | (!b & d),
            20..=39 => b ^ c ^ d,
            40..=59 => (b & c) | (b & d) | (c & d),
            _ => b ^ c ^ d,
        };

        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(ROUND_CONSTANTS[i / 20])
            .wrapping_add(word);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
}
