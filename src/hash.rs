//! Seeded 64-bit hashing over byte spans.
//!
//! Tables never hash typed keys directly. A key is first serialized through
//! its `core::hash::Hash` impl into a [`ByteSink`], and the collected bytes
//! are then digested by the table's [`HashFn`] together with the table seed.
//! This keeps the hashing contract byte-oriented so callers can swap in any
//! `fn(&[u8], u64) -> u64`.

use core::hash::{Hash, Hasher};

const MULTIPLIER: u64 = 0xc6a4_a793_5bd1_e995;
const SHIFT: u32 = 47;

/// Seed used when a table is built without an explicit one.
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// MurmurHash64A-style digest of `data` under `seed`.
///
/// Full 8-byte words are read little-endian so digests are identical across
/// platforms. The 1..=7 trailing bytes are OR-accumulated into a single word
/// before being folded in, followed by two finalization rounds.
///
/// ```
/// use chained_hash::hash::murmur64;
///
/// assert_eq!(murmur64(b"", 0), 0);
/// assert_ne!(murmur64(b"hello", 0), murmur64(b"hello", 1));
/// ```
pub fn murmur64(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(MULTIPLIER);

    let mut words = data.chunks_exact(8);
    for word in &mut words {
        let mut k = u64::from_le_bytes([
            word[0], word[1], word[2], word[3], word[4], word[5], word[6], word[7],
        ]);
        k = k.wrapping_mul(MULTIPLIER);
        k ^= k >> SHIFT;
        k = k.wrapping_mul(MULTIPLIER);

        h ^= k;
        h = h.wrapping_mul(MULTIPLIER);
    }

    let tail = words.remainder();
    if !tail.is_empty() {
        let folded = tail
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (8 * i)));
        h ^= folded;
        h = h.wrapping_mul(MULTIPLIER);
    }

    h ^= h >> SHIFT;
    h = h.wrapping_mul(MULTIPLIER);
    h ^= h >> SHIFT;
    h
}

/// A byte-span hash function: `(data, seed) -> digest`.
///
/// Must be deterministic. Any `Fn(&[u8], u64) -> u64` implements it.
pub trait HashFn {
    fn hash_bytes(&self, data: &[u8], seed: u64) -> u64;
}

/// The library default, [`murmur64`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Murmur64;

impl HashFn for Murmur64 {
    #[inline]
    fn hash_bytes(&self, data: &[u8], seed: u64) -> u64 {
        murmur64(data, seed)
    }
}

impl<F> HashFn for F
where
    F: Fn(&[u8], u64) -> u64,
{
    #[inline]
    fn hash_bytes(&self, data: &[u8], seed: u64) -> u64 {
        self(data, seed)
    }
}

/// Bytes a [`ByteSink`] holds before it spills to the heap.
const INLINE: usize = 32;

/// A `Hasher` that records the bytes a `Hash` impl writes.
///
/// Used to turn a typed key into the byte span a [`HashFn`] consumes.
/// `finish` digests the recorded bytes with [`murmur64`] and a zero seed, so
/// the sink is also usable as an ordinary hasher.
///
/// Up to 32 bytes are kept in an inline buffer, so hashing integers and
/// short strings does not allocate. Longer streams move to a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct ByteSink {
    inline: [u8; INLINE],
    len: usize,
    spill: Vec<u8>,
}

impl ByteSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` into a fresh sink.
    pub fn of<Q: Hash + ?Sized>(value: &Q) -> Self {
        let mut sink = Self::new();
        value.hash(&mut sink);
        sink
    }

    pub fn as_bytes(&self) -> &[u8] {
        if self.spilled() {
            &self.spill
        } else {
            &self.inline[..self.len]
        }
    }

    /// Whether the recorded stream outgrew the inline buffer.
    pub fn spilled(&self) -> bool {
        !self.spill.is_empty()
    }
}

impl Hasher for ByteSink {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        if self.spilled() {
            self.spill.extend_from_slice(bytes);
            return;
        }
        let end = self.len + bytes.len();
        if end <= INLINE {
            self.inline[self.len..end].copy_from_slice(bytes);
            self.len = end;
        } else {
            self.spill.reserve(end.max(2 * INLINE));
            self.spill.extend_from_slice(&self.inline[..self.len]);
            self.spill.extend_from_slice(bytes);
        }
    }

    fn finish(&self) -> u64 {
        murmur64(self.as_bytes(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_zero_seed_is_zero() {
        assert_eq!(murmur64(b"", 0), 0);
    }

    #[test]
    fn known_digests() {
        assert_eq!(murmur64(b"", 1), 0xc6a4_a793_5bd0_64dc);
        assert_eq!(murmur64(b"a", 0), 0x0717_17d2_d36b_6b11);
        assert_eq!(murmur64(b"hello", 0), 0x1e68_d17c_457b_f117);
        assert_eq!(murmur64(b"hello", 42), 0xd417_125c_cb97_1887);
        // Exactly one word, no tail.
        assert_eq!(murmur64(b"abcdefgh", 0), 0xafdb_0257_ff41_aa98);
        // One word plus a one-byte tail.
        assert_eq!(murmur64(b"abcdefghi", 0x9747_b28c), 0x63c2_a246_fd38_6297);
    }

    #[test]
    fn every_byte_matters() {
        let base = *b"the quick brown fox";
        let h0 = murmur64(&base, 7);
        for i in 0..base.len() {
            let mut flipped = base;
            flipped[i] ^= 0x01;
            assert_ne!(murmur64(&flipped, 7), h0, "byte {} ignored", i);
        }
    }

    #[test]
    fn length_is_mixed_in() {
        // Trailing zero bytes would OR-accumulate to the same tail word.
        assert_ne!(murmur64(&[1, 0], 3), murmur64(&[1], 3));
        assert_ne!(murmur64(&[0; 8], 3), murmur64(&[0; 16], 3));
    }

    #[test]
    fn closures_are_hash_fns() {
        let xor_len = |data: &[u8], seed: u64| seed ^ data.len() as u64;
        assert_eq!(xor_len.hash_bytes(b"abc", 8), 11);
        assert_eq!(Murmur64.hash_bytes(b"abc", 8), murmur64(b"abc", 8));
    }

    #[test]
    fn byte_sink_records_hash_stream() {
        let sink = ByteSink::of("a");
        // `str` writes its bytes followed by a 0xff terminator.
        assert_eq!(sink.as_bytes(), b"a\xff");
        assert_eq!(sink.finish(), 0x3860_cc5e_53c2_c9d1);

        let n = ByteSink::of(&0x0102_0304u32);
        assert_eq!(n.as_bytes(), &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn short_keys_stay_inline() {
        let sink = ByteSink::of(&[7u64, 8, 9][..]);
        // Slice length prefix plus three words.
        assert_eq!(sink.as_bytes().len(), core::mem::size_of::<usize>() + 24);
        assert!(!sink.spilled());
    }

    #[test]
    fn long_streams_spill_without_losing_bytes() {
        let key = "x".repeat(20) + &"y".repeat(20);
        let mut expected = key.clone().into_bytes();
        expected.push(0xff);

        let sink = ByteSink::of(key.as_str());
        assert!(sink.spilled());
        assert_eq!(sink.as_bytes(), &expected[..]);
        assert_eq!(sink.finish(), murmur64(&expected, 0));

        // Spill triggered by several small writes rather than one large one.
        let mut parts = ByteSink::new();
        for chunk in expected.chunks(7) {
            parts.write(chunk);
        }
        assert!(parts.spilled());
        assert_eq!(parts.as_bytes(), &expected[..]);
    }
}
