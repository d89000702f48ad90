//! Homomorphic operations on ciphertexts

use rand::{CryptoRng, RngCore};

use crate::arithmetic::ModInteger;
use crate::encryption::ElGamal;
use crate::error::Result;
use crate::types::CipherText;

/// Trait for homomorphic operations
pub trait HomomorphicOperations {
    /// `Enc(m1) * Enc(m2) = Enc(m1 + m2)`
    fn homomorphic_operation(&self, ct1: &CipherText, ct2: &CipherText) -> CipherText;

    /// `Enc(m)^k = Enc(k * m)`
    fn homomorphic_scalar_operation(&self, ct: &CipherText, scalar: &ModInteger)
        -> Result<CipherText>;

    /// Fold a batch of ciphertexts, starting from the identity
    fn homomorphic_batch_operation(&self, ciphertexts: &[CipherText]) -> CipherText;

    /// Multiply by a fresh encryption of zero
    fn rerandomize<R: RngCore + CryptoRng>(&self, ct: &CipherText, rng: &mut R)
        -> Result<CipherText>;
}

impl HomomorphicOperations for ElGamal {
    fn homomorphic_operation(&self, ct1: &CipherText, ct2: &CipherText) -> CipherText {
        ct1.operate(ct2)
    }

    fn homomorphic_scalar_operation(
        &self,
        ct: &CipherText,
        scalar: &ModInteger,
    ) -> Result<CipherText> {
        let k = scalar.to_modulus(self.public_key.q());
        let big_g = ct.big_g().pow(&k)?;
        let big_h = ct.big_h().pow(&k)?;

        Ok(match ct.randomness() {
            Some(r) => CipherText::with_randomness(big_g, big_h, r.multiply(&k)),
            None => CipherText::new(big_g, big_h),
        })
    }

    fn homomorphic_batch_operation(&self, ciphertexts: &[CipherText]) -> CipherText {
        ciphertexts
            .iter()
            .fold(CipherText::identity(&self.public_key), |acc, ct| {
                self.homomorphic_operation(&acc, ct)
            })
    }

    fn rerandomize<R: RngCore + CryptoRng>(
        &self,
        ct: &CipherText,
        rng: &mut R,
    ) -> Result<CipherText> {
        let zero = self.encrypt(&ModInteger::zero(), rng)?;
        Ok(self.homomorphic_operation(ct, &zero))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_keypair, rng};
    use proptest::prelude::*;

    #[test]
    fn test_homomorphic_addition() {
        let keypair = fixture_keypair();
        let elgamal = ElGamal::new(keypair.public_key.clone());
        let mut rng = rng(31);

        for m1 in 0u64..=1 {
            for m2 in 0u64..=1 {
                let ct1 = elgamal.encrypt(&m1.into(), &mut rng).unwrap();
                let ct2 = elgamal.encrypt(&m2.into(), &mut rng).unwrap();

                let ct_sum = elgamal.homomorphic_operation(&ct1, &ct2);
                let decrypted = elgamal.decrypt(&ct_sum, &keypair.private_key).unwrap();
                assert_eq!(decrypted, m1 + m2);
            }
        }
    }

    #[test]
    fn test_scalar_operation() {
        let keypair = fixture_keypair();
        let elgamal = ElGamal::new(keypair.public_key.clone());

        let ct = elgamal.encrypt(&7u64.into(), &mut rng(32)).unwrap();
        let scaled = elgamal
            .homomorphic_scalar_operation(&ct, &6u64.into())
            .unwrap();

        assert_eq!(elgamal.decrypt(&scaled, &keypair.private_key).unwrap(), 42);
        let expected_r = ct.randomness().unwrap().multiply(&6u64.into());
        assert_eq!(scaled.randomness(), Some(&expected_r));
    }

    #[test]
    fn test_batch_operations() {
        let keypair = fixture_keypair();
        let elgamal = ElGamal::new(keypair.public_key.clone());
        let mut rng = rng(33);

        let ciphertexts: Vec<_> = [10u64, 20, 15]
            .iter()
            .map(|&v| elgamal.encrypt(&v.into(), &mut rng).unwrap())
            .collect();

        let ct_sum = elgamal.homomorphic_batch_operation(&ciphertexts);
        assert_eq!(elgamal.decrypt(&ct_sum, &keypair.private_key).unwrap(), 45);

        let empty = elgamal.homomorphic_batch_operation(&[]);
        assert_eq!(empty, CipherText::identity(&keypair.public_key));
        assert_eq!(elgamal.decrypt(&empty, &keypair.private_key).unwrap(), 0);
    }

    #[test]
    fn test_rerandomization() {
        let keypair = fixture_keypair();
        let elgamal = ElGamal::new(keypair.public_key.clone());
        let mut rng = rng(34);

        let ct1 = elgamal.encrypt(&3u64.into(), &mut rng).unwrap();
        let ct2 = elgamal.rerandomize(&ct1, &mut rng).unwrap();

        assert_ne!(ct1, ct2);
        assert_eq!(elgamal.decrypt(&ct2, &keypair.private_key).unwrap(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn sum_of_ciphertexts_decrypts_to_sum(m1 in 0u64..50, m2 in 0u64..50, seed in any::<u64>()) {
            let keypair = fixture_keypair();
            let elgamal = ElGamal::new(keypair.public_key.clone());
            let mut rng = rng(seed);

            let ct1 = elgamal.encrypt(&m1.into(), &mut rng).unwrap();
            let ct2 = elgamal.encrypt(&m2.into(), &mut rng).unwrap();
            let sum = elgamal.homomorphic_operation(&ct1, &ct2);

            prop_assert_eq!(elgamal.decrypt(&sum, &keypair.private_key).unwrap(), m1 + m2);
        }
    }
}
