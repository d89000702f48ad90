//! Core types and data structures

use std::fmt;

use num_bigint::BigInt;
use num_traits::One;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::ModInteger;
use crate::keys::PublicKey;

/// Exponential ElGamal ciphertext `(G, H) = (g^r, h^r * g^m)`
///
/// The encryption randomness `r` is only known to the party that encrypted.
/// It is needed to build membership proofs, never to verify or combine them,
/// and it is never serialized.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CipherText {
    pub(crate) big_g: ModInteger,
    pub(crate) big_h: ModInteger,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) randomness: Option<ModInteger>,
}

impl CipherText {
    /// Create a ciphertext from its group elements, without randomness
    pub fn new(big_g: ModInteger, big_h: ModInteger) -> Self {
        CipherText {
            big_g,
            big_h,
            randomness: None,
        }
    }

    pub(crate) fn with_randomness(big_g: ModInteger, big_h: ModInteger, r: ModInteger) -> Self {
        CipherText {
            big_g,
            big_h,
            randomness: Some(r),
        }
    }

    /// The encryption of zero with zero randomness, i.e. the group identity `(1, 1)`
    pub fn identity(public_key: &PublicKey) -> Self {
        let one = ModInteger::from_parts(BigInt::one(), public_key.p().value().clone());
        let r = ModInteger::zero().to_modulus(public_key.q());
        CipherText::with_randomness(one.clone(), one, r)
    }

    /// Get the first component `G = g^r`
    pub fn big_g(&self) -> &ModInteger {
        &self.big_g
    }

    /// Get the second component `H = h^r * g^m`
    pub fn big_h(&self) -> &ModInteger {
        &self.big_h
    }

    /// The encryption randomness, if this party encrypted the value
    pub fn randomness(&self) -> Option<&ModInteger> {
        self.randomness.as_ref()
    }

    /// A copy without the encryption randomness, safe to hand to other parties
    pub fn without_randomness(&self) -> Self {
        CipherText::new(self.big_g.clone(), self.big_h.clone())
    }

    /// Componentwise product: the ciphertext of the sum of both plaintexts.
    ///
    /// The randomness of the result is the sum of both randomness values when
    /// both are known.
    pub fn operate(&self, other: &CipherText) -> CipherText {
        let randomness = match (&self.randomness, &other.randomness) {
            (Some(r1), Some(r2)) => Some(r1.add(r2)),
            _ => None,
        };

        CipherText {
            big_g: self.big_g.multiply(&other.big_g),
            big_h: self.big_h.multiply(&other.big_h),
            randomness,
        }
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.big_g.value().to_signed_bytes_be().len() + self.big_h.value().to_signed_bytes_be().len()
    }
}

impl PartialEq for CipherText {
    fn eq(&self, other: &Self) -> bool {
        self.big_g == other.big_g && self.big_h == other.big_h
    }
}

impl Eq for CipherText {}

impl fmt::Display for CipherText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherText({} bytes)", self.size_bytes())
    }
}

/// Configuration for ElGamal operations
#[derive(Clone, Debug)]
pub struct ElGamalConfig {
    /// Upper bound of the linear search run by decryption
    pub max_plaintext: u64,
    /// Ballots encode a value in `{0, ..., ballot_domain_max}`
    pub ballot_domain_max: u64,
    /// Number of Miller-Rabin rounds for primality testing
    pub primality_test_rounds: usize,
    /// Smallest modulus accepted by key generation
    pub min_key_bits: u64,
}

impl ElGamalConfig {
    /// The plaintext domain of a single ballot
    pub fn ballot_domain(&self) -> Vec<ModInteger> {
        (0..=self.ballot_domain_max).map(ModInteger::from).collect()
    }
}

impl Default for ElGamalConfig {
    fn default() -> Self {
        ElGamalConfig {
            max_plaintext: 1_000_000,
            ballot_domain_max: 1,
            primality_test_rounds: 20,
            min_key_bits: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture_keypair;

    #[test]
    fn test_identity_is_neutral() {
        let keypair = fixture_keypair();
        let pk = &keypair.public_key;
        let ct = CipherText::new(pk.g().clone(), pk.h().clone());

        let combined = CipherText::identity(pk).operate(&ct);
        assert_eq!(combined, ct);
        assert!(combined.randomness().is_none());
    }

    #[test]
    fn test_operate_adds_randomness() {
        let keypair = fixture_keypair();
        let pk = &keypair.public_key;
        let r1 = ModInteger::from(5u32).to_modulus(pk.q());
        let r2 = ModInteger::from(7u32).to_modulus(pk.q());
        let ct1 = CipherText::with_randomness(pk.g().clone(), pk.h().clone(), r1);
        let ct2 = CipherText::with_randomness(pk.g().clone(), pk.h().clone(), r2);

        let sum = ct1.operate(&ct2);
        assert_eq!(sum.randomness(), Some(&ModInteger::from(12u32)));
        assert_eq!(sum.big_g(), &pk.g().multiply(pk.g()));
    }

    #[test]
    fn test_equality_ignores_randomness() {
        let keypair = fixture_keypair();
        let pk = &keypair.public_key;
        let ct = CipherText::identity(pk);

        assert_eq!(ct, ct.without_randomness());
        assert!(ct.without_randomness().randomness().is_none());
    }

    #[test]
    fn test_default_ballot_domain() {
        let domain = ElGamalConfig::default().ballot_domain();
        assert_eq!(domain, vec![ModInteger::zero(), ModInteger::one()]);
    }
}
