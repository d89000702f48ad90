//! Homomorphic tally and threshold decryption
//!
//! Votes are summed in the ciphertext domain and only the sum is ever
//! decrypted. Each authority contributes a partial decryption `G^(x_i)` of
//! the summed ciphertext; the shares are recombined in the exponent with
//! Lagrange coefficients and the total recovered by a bounded search.

use rayon::prelude::*;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::proofs::MembershipProof;
use crate::types::{CipherText, ElGamalConfig};
use crate::utils::bounded_discrete_log;

/// An encrypted vote together with the proof that it encodes a legal value
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ballot {
    pub ciphertext: CipherText,
    pub proof: MembershipProof,
}

impl Ballot {
    pub fn new(ciphertext: CipherText, proof: MembershipProof) -> Self {
        Ballot { ciphertext, proof }
    }
}

/// A single election: a public key and the ordered list of cast votes
#[derive(Clone, Debug)]
pub struct Election {
    public_key: PublicKey,
    config: ElGamalConfig,
    votes: Vec<CipherText>,
}

impl Election {
    pub fn new(public_key: PublicKey) -> Self {
        Self::with_config(public_key, ElGamalConfig::default())
    }

    pub fn with_config(public_key: PublicKey, config: ElGamalConfig) -> Self {
        Election {
            public_key,
            config,
            votes: Vec::new(),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Record a vote without any checks
    pub fn cast_vote(&mut self, vote: CipherText) {
        self.votes.push(vote);
        debug!(votes = self.votes.len(), "vote cast");
    }

    /// Record a ballot once its proof verifies against the ballot domain
    pub fn cast_ballot(&mut self, ballot: Ballot) -> Result<()> {
        let domain = self.config.ballot_domain();
        if !ballot.proof.verify(&self.public_key, &ballot.ciphertext, &domain) {
            warn!(votes = self.votes.len(), "ballot rejected: membership proof does not verify");
            return Err(ElGamalError::InvalidProof(
                "ballot does not encrypt a value of the ballot domain".to_string(),
            ));
        }

        self.cast_vote(ballot.ciphertext);
        Ok(())
    }

    pub fn votes(&self) -> &[CipherText] {
        &self.votes
    }

    /// The homomorphic sum of all cast votes
    pub fn sum_votes(&self) -> CipherText {
        tally(&self.public_key, &self.votes)
    }

    /// Recover the total from the authorities' shares of the summed votes.
    ///
    /// The search is bounded by the largest possible total,
    /// `votes * ballot_domain_max`.
    pub fn final_sum(&self, shares: &[ModInteger], coefficients: &[ModInteger]) -> Result<u64> {
        let bound = (self.votes.len() as u64).saturating_mul(self.config.ballot_domain_max);
        final_sum(shares, coefficients, &self.sum_votes(), &self.public_key, bound)
    }
}

/// Fold votes with `operate`, starting from the encryption of zero
pub fn tally(public_key: &PublicKey, votes: &[CipherText]) -> CipherText {
    let sum = votes
        .iter()
        .fold(CipherText::identity(public_key), |acc, vote| acc.operate(vote));
    debug!(votes = votes.len(), "votes tallied");
    sum
}

/// Same as [`tally`], as a parallel tree reduction
pub fn tally_parallel(public_key: &PublicKey, votes: &[CipherText]) -> CipherText {
    let sum = votes
        .par_iter()
        .cloned()
        .reduce(|| CipherText::identity(public_key), |a, b| a.operate(&b));
    debug!(votes = votes.len(), "votes tallied in parallel");
    sum
}

/// An authority's share of the decryption of `ciphertext`: `G^x`
pub fn partial_decrypt(private_key: &PrivateKey, ciphertext: &CipherText) -> Result<ModInteger> {
    ciphertext.big_g().to_modulus(private_key.p()).pow(private_key.x())
}

/// Combine partial decryptions and search `g^j == H / Π share_i^(λ_i)` for
/// `j` in `[0, bound]`
pub fn final_sum(
    shares: &[ModInteger],
    coefficients: &[ModInteger],
    tally: &CipherText,
    public_key: &PublicKey,
    bound: u64,
) -> Result<u64> {
    if shares.len() != coefficients.len() {
        return Err(ElGamalError::invalid_argument(format!(
            "shares: {}, coefficients: {}",
            shares.len(),
            coefficients.len()
        )));
    }

    let p = public_key.p();
    let mut pli = ModInteger::one().to_modulus(p);
    for (share, coefficient) in shares.iter().zip(coefficients) {
        pli = pli.multiply(&share.to_modulus(p).pow(coefficient)?);
    }

    let target = tally.big_h().to_modulus(p).divide(&pli)?;
    let total = bounded_discrete_log(public_key.g(), &target, bound)?;
    debug!(total, shares = shares.len(), "tally decrypted");
    Ok(total)
}
