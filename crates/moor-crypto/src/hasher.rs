use moor_types::{ContentHash, HashWidth};

/// Width-parameterized BLAKE3 content hasher.
///
/// Pure and deterministic: the same payload and width always yield the same
/// [`ContentHash`]. Widths other than 256 bits are produced through the
/// BLAKE3 extendable output, so every width is a prefix-independent digest
/// of the full input.
pub struct ContentHasher;

impl ContentHasher {
    /// Hash a payload at the given width.
    pub fn hash(payload: &[u8], width: HashWidth) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(payload);
        let mut out = vec![0u8; width.byte_len()];
        hasher.finalize_xof().fill(&mut out);
        ContentHash::from_digest(out).expect("digest produced at valid width")
    }

    /// Verify that a payload produces the expected hash at its width.
    pub fn verify(payload: &[u8], expected: &ContentHash) -> bool {
        Self::hash(payload, expected.width()) == *expected
    }
}
