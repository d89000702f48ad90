//! Key material
//!
//! Keys are created once by a key-management collaborator and never change.
//! The generation helpers below cover tests, demos and benchmarks.

use std::fmt;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};
use crate::types::ElGamalConfig;
use crate::utils::{find_subgroup_generator, generate_safe_prime};

/// ElGamal public key `{p, q, g, h}`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PublicKey {
    pub(crate) p: ModInteger, // Safe prime modulus
    pub(crate) q: ModInteger, // (p - 1) / 2
    pub(crate) g: ModInteger, // Generator of the order-q subgroup, mod p
    pub(crate) h: ModInteger, // g^x mod p
}

impl PublicKey {
    /// Create and validate a public key
    pub fn new(p: BigUint, q: BigUint, g: BigUint, h: BigUint) -> Result<Self> {
        check_below_modulus(&g, &p, "Generator g must be in range (1, p)")?;
        check_below_modulus(&h, &p, "Public component h must be in range (1, p)")?;
        let public_key = Self::from_parts(p, q, g, h);
        public_key.validate()?;
        Ok(public_key)
    }

    fn from_parts(p: BigUint, q: BigUint, g: BigUint, h: BigUint) -> Self {
        PublicKey {
            g: ModInteger::new(g, p.clone()),
            h: ModInteger::new(h, p.clone()),
            p: ModInteger::from(p),
            q: ModInteger::from(q),
        }
    }

    /// Get the prime modulus
    pub fn p(&self) -> &ModInteger {
        &self.p
    }

    /// Get the subgroup order `q = (p - 1) / 2`
    pub fn q(&self) -> &ModInteger {
        &self.q
    }

    /// Get the generator
    pub fn g(&self) -> &ModInteger {
        &self.g
    }

    /// Get the public component `h = g^x mod p`
    pub fn h(&self) -> &ModInteger {
        &self.h
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.value().bits()
    }

    /// Validate the structural invariants of the key
    pub fn validate(&self) -> Result<()> {
        validate_group(&self.p, &self.q, &self.g)?;

        let one = ModInteger::one();
        if self.h <= one {
            return Err(ElGamalError::InvalidKey(
                "Public component h must be in range (1, p)".to_string(),
            ));
        }
        if self.h.pow(&self.q)? != one {
            return Err(ElGamalError::InvalidKey(
                "Public component h is not in the order-q subgroup".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bits)", self.bit_size())
    }
}

// Components are stored reduced mod p, so the upper bound is checked on the raw input
fn check_below_modulus(value: &BigUint, p: &BigUint, message: &str) -> Result<()> {
    if value >= p {
        return Err(ElGamalError::InvalidKey(message.to_string()));
    }
    Ok(())
}

fn validate_group(p: &ModInteger, q: &ModInteger, g: &ModInteger) -> Result<()> {
    if p.value() <= &BigInt::from(5u32) {
        return Err(ElGamalError::InvalidKey("Modulus p must be > 5".to_string()));
    }

    let expected_q = p.subtract(&ModInteger::one()).divide(&ModInteger::two())?;
    if q != &expected_q {
        return Err(ElGamalError::InvalidKey(
            "Subgroup order q must equal (p - 1) / 2".to_string(),
        ));
    }

    let one = ModInteger::one();
    if g <= &one {
        return Err(ElGamalError::InvalidKey(
            "Generator g must be in range (1, p)".to_string(),
        ));
    }
    if g.pow(q)? != one {
        return Err(ElGamalError::InvalidKey(
            "Generator g does not generate the order-q subgroup".to_string(),
        ));
    }

    Ok(())
}

/// ElGamal private key `{p, q, g, x}`
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrivateKey {
    pub(crate) p: ModInteger,
    pub(crate) q: ModInteger,
    pub(crate) g: ModInteger,
    pub(crate) x: ModInteger, // Secret exponent, mod q
}

impl PrivateKey {
    /// Create and validate a private key
    pub fn new(p: BigUint, q: BigUint, g: BigUint, x: BigUint) -> Result<Self> {
        check_below_modulus(&g, &p, "Generator g must be in range (1, p)")?;
        let p = ModInteger::from(p);
        let q = ModInteger::from(q);
        let g = ModInteger::from(g).to_modulus(&p);
        validate_group(&p, &q, &g)?;

        let x = ModInteger::from(x).to_modulus(&q);
        if x.is_zero() {
            return Err(ElGamalError::InvalidKey(
                "Secret exponent x must be non-zero mod q".to_string(),
            ));
        }

        Ok(PrivateKey { p, q, g, x })
    }

    pub fn p(&self) -> &ModInteger {
        &self.p
    }

    pub fn q(&self) -> &ModInteger {
        &self.q
    }

    pub fn g(&self) -> &ModInteger {
        &self.g
    }

    /// Get the secret exponent
    pub fn x(&self) -> &ModInteger {
        &self.x
    }

    /// Derive the matching public key `h = g^x mod p`
    pub fn public_key(&self) -> Result<PublicKey> {
        let h = self.g.pow(&self.x)?;
        Ok(PublicKey {
            p: self.p.clone(),
            q: self.q.clone(),
            g: self.g.clone(),
            h,
        })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("p", &self.p)
            .field("q", &self.q)
            .field("g", &self.g)
            .field("x", &"***")
            .finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(***)")
    }
}

/// ElGamal key pair
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair over a fresh safe prime of `bit_size` bits
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use hevote::{ElGamalConfig, KeyPair};
    ///
    /// let keypair = KeyPair::generate(1024, &ElGamalConfig::default(), &mut rand::rngs::OsRng)
    ///     .expect("Failed to generate keys");
    /// ```
    pub fn generate<R: RngCore + CryptoRng>(
        bit_size: u64,
        config: &ElGamalConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if bit_size < config.min_key_bits {
            return Err(ElGamalError::InvalidKeySize(bit_size, config.min_key_bits));
        }
        Self::generate_unchecked(bit_size, config.primality_test_rounds, rng)
    }

    /// Generate a key pair of any size, skipping the minimum size check
    pub fn generate_for_testing<R: RngCore + CryptoRng>(bit_size: u64, rng: &mut R) -> Result<Self> {
        Self::generate_unchecked(bit_size, ElGamalConfig::default().primality_test_rounds, rng)
    }

    fn generate_unchecked<R: RngCore + CryptoRng>(
        bit_size: u64,
        rounds: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let (p, q) = generate_safe_prime(bit_size, rounds, rng)?;
        let g = find_subgroup_generator(&p, &q, rng);

        // Private exponent x from [1, q)
        let x = rng.gen_biguint_range(&BigUint::one(), &q);

        let private_key = PrivateKey::new(p, q, g, x)?;
        let public_key = private_key.public_key()?;
        public_key.validate()?;

        Ok(KeyPair {
            public_key,
            private_key,
        })
    }

    /// Create a key pair from existing components, with `q = (p - 1) / 2`
    pub fn from_components(p: BigUint, g: BigUint, x: BigUint) -> Result<Self> {
        let q = (&p - 1u32) / 2u32;
        let private_key = PrivateKey::new(p, q, g, x)?;
        let public_key = private_key.public_key()?;
        public_key.validate()?;

        Ok(KeyPair {
            public_key,
            private_key,
        })
    }

    /// Get the bit size of the keys
    pub fn bit_size(&self) -> u64 {
        self.public_key.bit_size()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({} bits)", self.bit_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_keypair, hex, rng, FIXTURE_G, FIXTURE_H, FIXTURE_P, FIXTURE_Q};

    #[test]
    fn test_fixture_is_valid() {
        let keypair = fixture_keypair();
        keypair.public_key.validate().unwrap();
        assert_eq!(keypair.bit_size(), 512);
        assert_eq!(keypair.private_key.public_key().unwrap(), keypair.public_key);
        assert_eq!(keypair.public_key.h(), &ModInteger::from(hex(FIXTURE_H)));
    }

    #[test]
    fn test_key_generation() {
        let keypair = KeyPair::generate_for_testing(64, &mut rng(11)).unwrap();

        assert_eq!(keypair.bit_size(), 64);
        keypair.public_key.validate().unwrap();
    }

    #[test]
    fn test_key_size_validation() {
        let err = KeyPair::generate(256, &ElGamalConfig::default(), &mut rng(12)).unwrap_err();
        assert_eq!(err, ElGamalError::InvalidKeySize(256, 512));
    }

    #[test]
    fn test_key_validation() {
        // p = 23 is a safe prime, 5 generates the full group rather than the subgroup
        let err = PublicKey::new(23u32.into(), 11u32.into(), 5u32.into(), 4u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));

        // wrong q
        let err = PublicKey::new(23u32.into(), 10u32.into(), 4u32.into(), 2u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));

        // h = 1
        let err = PublicKey::new(23u32.into(), 11u32.into(), 4u32.into(), 1u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));

        assert!(PublicKey::new(23u32.into(), 11u32.into(), 4u32.into(), 2u32.into()).is_ok());
    }

    #[test]
    fn test_components_not_reduced_into_range() {
        // 27 = 4 and 25 = 2 mod 23, but neither is a valid component as given
        let err = PublicKey::new(23u32.into(), 11u32.into(), 27u32.into(), 2u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));

        let err = PublicKey::new(23u32.into(), 11u32.into(), 4u32.into(), 25u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));

        let err = PrivateKey::new(23u32.into(), 11u32.into(), 27u32.into(), 3u32.into()).unwrap_err();
        assert!(matches!(err, ElGamalError::InvalidKey(_)));
    }

    #[test]
    fn test_from_components() {
        let keypair = KeyPair::from_components(hex(FIXTURE_P), hex(FIXTURE_G), 42u32.into()).unwrap();
        assert_eq!(keypair.public_key.q(), &ModInteger::from(hex(FIXTURE_Q)));
        assert_eq!(
            keypair.public_key.h(),
            &keypair.public_key.g().pow(&ModInteger::from(42u32)).unwrap()
        );
    }

    #[test]
    fn test_private_key_debug_hides_secret() {
        let keypair = fixture_keypair();
        let debug = format!("{:?}", keypair.private_key);
        assert!(debug.contains("***"));
        assert!(!debug.contains(&keypair.private_key.x().value().to_string()));
    }
}
