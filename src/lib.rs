//! # hevote
//!
//! Verifiable additive-homomorphic ElGamal for anonymous, auditable vote tallying:
//! - Exponential ElGamal over the order-q subgroup of a safe prime group
//! - Non-interactive membership proofs showing a ballot encrypts a legal value
//! - Homomorphic combination of ballots and of their proofs
//! - Threshold decryption of the tally with Lagrange combination
//!
//! ## Example
//!
//! ```rust,no_run
//! use hevote::{ElGamal, ElGamalConfig, KeyPair, MembershipProof, ModInteger};
//! use hevote::election::{Ballot, Election};
//!
//! let mut rng = rand::rngs::OsRng;
//! let keypair = KeyPair::generate(1024, &ElGamalConfig::default(), &mut rng).unwrap();
//! let elgamal = ElGamal::new(keypair.public_key.clone());
//! let domain = elgamal.config().ballot_domain();
//!
//! // Encrypt a vote and prove it is 0 or 1
//! let vote = ModInteger::one();
//! let ciphertext = elgamal.encrypt(&vote, &mut rng).unwrap();
//! let proof = MembershipProof::commit(&keypair.public_key, &vote, &ciphertext, &domain, &mut rng).unwrap();
//!
//! let mut election = Election::new(keypair.public_key.clone());
//! election.cast_ballot(Ballot::new(ciphertext, proof)).unwrap();
//!
//! // A single authority decrypts the sum
//! let share = hevote::election::partial_decrypt(&keypair.private_key, &election.sum_votes()).unwrap();
//! assert_eq!(election.final_sum(&[share], &[ModInteger::one()]).unwrap(), 1);
//! ```

pub mod arithmetic;
pub mod election;
pub mod encoding;
pub mod encryption;
pub mod error;
pub mod homomorphic;
pub mod keys;
pub mod polynomial;
pub mod proofs;
pub mod transcript;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types for convenience
pub use arithmetic::ModInteger;
pub use election::{Ballot, Election};
pub use encryption::ElGamal;
pub use error::{ElGamalError, Result};
pub use homomorphic::HomomorphicOperations;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use polynomial::Polynomial;
pub use proofs::MembershipProof;
pub use types::{CipherText, ElGamalConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_keypair, rng};

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_basic_workflow() {
        let keypair = fixture_keypair();
        let elgamal = ElGamal::new(keypair.public_key.clone());
        let domain = elgamal.config().ballot_domain();
        let mut rng = rng(1);

        let vote = ModInteger::one();
        let ct = elgamal.encrypt(&vote, &mut rng).unwrap();
        let proof = MembershipProof::commit(&keypair.public_key, &vote, &ct, &domain, &mut rng).unwrap();
        assert!(proof.verify(&keypair.public_key, &ct, &domain));

        assert_eq!(elgamal.decrypt(&ct, &keypair.private_key).unwrap(), 1);
    }
}
