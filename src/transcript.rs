//! Fiat-Shamir transcript
//!
//! Commit, combine and verify all hash the same ordered sequence
//! `g, h, G, H, y_0, z_0, ..., y_{n-1}, z_{n-1}`; the challenge is the digest
//! read as a big-endian integer and reduced mod `q`.

use num_bigint::{BigInt, Sign};
use sha2::{Digest, Sha256};

use crate::arithmetic::ModInteger;

const DOMAIN_SEPARATOR: &[u8] = b"HEVOTE_MEMBERSHIP_PROOF";

pub struct Transcript<D: Digest = Sha256> {
    hasher: D,
}

impl Transcript<Sha256> {
    pub fn new(label: &[u8]) -> Self {
        Self::with_digest(label)
    }
}

impl<D: Digest> Transcript<D> {
    /// Start a transcript over any `sha2`-style digest
    pub fn with_digest(label: &[u8]) -> Self {
        let mut hasher = D::new();
        hasher.update(DOMAIN_SEPARATOR);
        hasher.update((label.len() as u64).to_be_bytes());
        hasher.update(label);
        Transcript { hasher }
    }

    /// Absorb one integer, length-prefixed so adjacent values cannot run together
    pub fn append(&mut self, value: &ModInteger) {
        let bytes = value.value().to_signed_bytes_be();
        self.hasher.update((bytes.len() as u64).to_be_bytes());
        self.hasher.update(&bytes);
    }

    pub fn append_all<'a>(&mut self, values: impl IntoIterator<Item = &'a ModInteger>) {
        for value in values {
            self.append(value);
        }
    }

    /// Finish the transcript and reduce the digest mod `q`
    pub fn challenge(self, q: &ModInteger) -> ModInteger {
        let digest = self.hasher.finalize();
        ModInteger::from(BigInt::from_bytes_be(Sign::Plus, &digest)).to_modulus(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::Sha512;

    fn challenge_of(values: &[u32]) -> ModInteger {
        let mut transcript = Transcript::new(b"test");
        for &v in values {
            transcript.append(&ModInteger::from(v));
        }
        transcript.challenge(&ModInteger::from(1_000_003u32))
    }

    #[test]
    fn test_challenge_is_deterministic() {
        assert_eq!(challenge_of(&[1, 2, 3]), challenge_of(&[1, 2, 3]));
        assert_ne!(challenge_of(&[1, 2, 3]), challenge_of(&[3, 2, 1]));
    }

    #[test]
    fn test_challenge_is_reduced() {
        let q = ModInteger::from(1_000_003u32);
        let c = challenge_of(&[42]);
        assert!(c < q);
        assert_eq!(c.modulus(), q.value());
    }

    #[test]
    fn test_values_are_length_prefixed() {
        // 0x0102 followed by 0x03 must differ from 0x01 followed by 0x0203
        assert_ne!(challenge_of(&[0x0102, 0x03]), challenge_of(&[0x01, 0x0203]));
    }

    #[test]
    fn test_label_separates_transcripts() {
        let q = ModInteger::from(1_000_003u32);
        let mut a = Transcript::new(b"a");
        let mut b = Transcript::new(b"b");
        a.append(&ModInteger::one());
        b.append(&ModInteger::one());
        assert_ne!(a.challenge(&q), b.challenge(&q));
    }

    #[test]
    fn test_other_digest() {
        let q = ModInteger::from(1_000_003u32);
        let mut transcript = Transcript::<Sha512>::with_digest(b"test");
        transcript.append_all(&[ModInteger::one(), ModInteger::two()]);
        assert!(transcript.challenge(&q) < q);
    }
}
