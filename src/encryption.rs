//! Exponential ElGamal encryption and decryption

use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::types::{CipherText, ElGamalConfig};
use crate::utils::bounded_discrete_log;

/// Additive-homomorphic ElGamal over the order-q subgroup of a public key
#[derive(Clone, Debug)]
pub struct ElGamal {
    pub public_key: PublicKey,
    config: ElGamalConfig,
}

impl ElGamal {
    pub fn new(public_key: PublicKey) -> Self {
        Self::with_config(public_key, ElGamalConfig::default())
    }

    /// Create a new ElGamal instance with custom configuration
    pub fn with_config(public_key: PublicKey, config: ElGamalConfig) -> Self {
        ElGamal { public_key, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &ElGamalConfig {
        &self.config
    }

    /// Encrypt `m` as `(g^r, h^r * g^m)` with fresh randomness `r` from `[0, q)`
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        plaintext: &ModInteger,
        rng: &mut R,
    ) -> Result<CipherText> {
        let r = ModInteger::random(self.public_key.q(), rng)?;
        self.encrypt_with_randomness(plaintext, &r)
    }

    /// Encrypt with caller-supplied randomness
    pub fn encrypt_with_randomness(
        &self,
        plaintext: &ModInteger,
        randomness: &ModInteger,
    ) -> Result<CipherText> {
        if plaintext.value() < &BigInt::from(0) {
            return Err(ElGamalError::invalid_argument(format!(
                "plaintext must be non-negative, got {}",
                plaintext.value()
            )));
        }
        if plaintext.value() > &BigInt::from(self.config.max_plaintext) {
            return Err(ElGamalError::PlaintextTooLarge {
                max: self.config.max_plaintext,
            });
        }

        let pk = &self.public_key;
        let r = randomness.to_modulus(pk.q());

        let big_g = pk.g().pow(&r)?;
        // Encode message in exponent: g^m
        let g_m = pk.g().pow(plaintext)?;
        let big_h = pk.h().pow(&r)?.multiply(&g_m);

        Ok(CipherText::with_randomness(big_g, big_h, r))
    }

    /// Decrypt a ciphertext by searching `g^i == H / G^x` for `i` in `[0, max_plaintext]`
    pub fn decrypt(&self, ciphertext: &CipherText, private_key: &PrivateKey) -> Result<u64> {
        let g_to_m = self.g_to_plaintext(ciphertext, private_key)?;
        let m = bounded_discrete_log(self.public_key.g(), &g_to_m, self.config.max_plaintext)?;
        debug!(plaintext = m, "decrypted ciphertext");
        Ok(m)
    }

    fn g_to_plaintext(&self, ciphertext: &CipherText, private_key: &PrivateKey) -> Result<ModInteger> {
        let p = self.public_key.p();
        let shared = ciphertext.big_g().to_modulus(p).pow(private_key.x())?;
        ciphertext.big_h().to_modulus(p).divide(&shared)
    }
}
