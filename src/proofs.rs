//! Non-interactive zero-knowledge membership proofs
//!
//! A [`MembershipProof`] shows that a ciphertext encrypts one value of a public
//! domain `D = (d_0, ..., d_{n-1})` without revealing which one. It is a
//! disjunction of Chaum-Pedersen proofs made non-interactive with Fiat-Shamir:
//! every branch except the true one is simulated, and the true branch takes
//! whatever challenge is left over so that all challenges sum to the hash of
//! the transcript.

use std::fmt;

use rand::{CryptoRng, RngCore};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};
use crate::keys::PublicKey;
use crate::transcript::Transcript;
use crate::types::CipherText;

const TRANSCRIPT_LABEL: &[u8] = b"membership";

/// Proof that a ciphertext encrypts a member of a plaintext domain
///
/// Holds one `(y_i, z_i, s_i, c_i)` per domain value. `y`, `z` live mod `p`,
/// `s`, `c` mod `q`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MembershipProof {
    p: ModInteger,
    q: ModInteger,
    y: Vec<ModInteger>,
    z: Vec<ModInteger>,
    s: Vec<ModInteger>,
    c: Vec<ModInteger>,
}

impl MembershipProof {
    /// Assemble a proof from its parts, reducing every entry into its group
    pub fn new(
        p: ModInteger,
        q: ModInteger,
        y: Vec<ModInteger>,
        z: Vec<ModInteger>,
        s: Vec<ModInteger>,
        c: Vec<ModInteger>,
    ) -> Self {
        let reduce = |values: Vec<ModInteger>, m: &ModInteger| -> Vec<ModInteger> {
            values.iter().map(|v| v.to_modulus(m)).collect()
        };

        MembershipProof {
            y: reduce(y, &p),
            z: reduce(z, &p),
            s: reduce(s, &q),
            c: reduce(c, &q),
            p: p.without_modulus(),
            q: q.without_modulus(),
        }
    }

    pub fn p(&self) -> &ModInteger {
        &self.p
    }

    pub fn q(&self) -> &ModInteger {
        &self.q
    }

    pub fn y(&self) -> &[ModInteger] {
        &self.y
    }

    pub fn z(&self) -> &[ModInteger] {
        &self.z
    }

    pub fn s(&self) -> &[ModInteger] {
        &self.s
    }

    pub fn c(&self) -> &[ModInteger] {
        &self.c
    }

    /// Number of domain values the proof covers
    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    /// Prove that `ciphertext` encrypts `plaintext`, a member of `domain`.
    ///
    /// The ciphertext must carry its encryption randomness. A plaintext that is
    /// not in the domain still yields a proof, using index 0 as the true
    /// branch; that proof does not verify.
    pub fn commit<R: RngCore + CryptoRng>(
        public_key: &PublicKey,
        plaintext: &ModInteger,
        ciphertext: &CipherText,
        domain: &[ModInteger],
        rng: &mut R,
    ) -> Result<Self> {
        if domain.is_empty() {
            return Err(ElGamalError::invalid_argument("proof domain is empty"));
        }
        let r = ciphertext.randomness().ok_or_else(|| {
            ElGamalError::invalid_argument("ciphertext randomness is required to commit")
        })?;

        let j = match domain.iter().position(|d| d == plaintext) {
            Some(j) => j,
            None => {
                debug!("plaintext is outside the proof domain");
                0
            }
        };

        let q = public_key.q();
        let proof = prove(
            public_key,
            ciphertext.big_g(),
            ciphertext.big_h(),
            domain,
            j,
            r,
            rng,
            |_, rng| Ok((ModInteger::random(q, rng)?, ModInteger::random(q, rng)?)),
        )?;

        debug!(domain_size = domain.len(), "membership proof committed");
        Ok(proof)
    }

    /// Check the proof against a ciphertext and domain.
    ///
    /// Malformed proofs and arithmetic failures are reported as `false`.
    pub fn verify(&self, public_key: &PublicKey, ciphertext: &CipherText, domain: &[ModInteger]) -> bool {
        match self.check(public_key, ciphertext, domain) {
            Ok(valid) => {
                debug!(valid, "membership proof verified");
                valid
            }
            Err(err) => {
                debug!(%err, "membership proof verification failed");
                false
            }
        }
    }

    fn check(&self, public_key: &PublicKey, ciphertext: &CipherText, domain: &[ModInteger]) -> Result<bool> {
        let n = self.c.len();
        if n == 0 || self.s.len() != n || self.y.len() != n || self.z.len() != n {
            return Ok(false);
        }
        if domain.len() < n {
            return Ok(false);
        }
        if &self.p != public_key.p() || &self.q != public_key.q() {
            return Ok(false);
        }

        let q = public_key.q();
        let big_g = ciphertext.big_g().to_modulus(public_key.p());
        let big_h = ciphertext.big_h().to_modulus(public_key.p());

        let mut y = Vec::with_capacity(n);
        let mut z = Vec::with_capacity(n);
        let mut c_choices = ModInteger::zero().to_modulus(q);

        for i in 0..n {
            let s_i = self.s[i].to_modulus(q);
            let c_i = self.c[i].to_modulus(q);
            let (y_i, z_i) = simulated_commitment(public_key, &big_g, &big_h, &domain[i], &s_i, &c_i)?;
            y.push(y_i);
            z.push(z_i);
            c_choices = c_choices.add(&c_i);
        }

        let new_c = challenge(public_key, &big_g, &big_h, &y, &z);
        Ok(c_choices == new_c)
    }

    /// Prove that `ct1 * ct2` encrypts a member of `domain`, reusing the
    /// challenges and responses of the proofs of both operands.
    ///
    /// Both ciphertexts must carry their randomness. The sub-proofs are taken
    /// to cover the domain `{0, ..., n-1}`, so the entry for a combined value
    /// `d` is the sub-proof entry at index `d`.
    pub fn combine<R: RngCore + CryptoRng>(
        public_key: &PublicKey,
        ct1: &CipherText,
        proof1: &MembershipProof,
        ct2: &CipherText,
        proof2: &MembershipProof,
        domain: &[ModInteger],
        rng: &mut R,
    ) -> Result<Self> {
        if domain.is_empty() {
            return Err(ElGamalError::invalid_argument("proof domain is empty"));
        }
        let missing = || ElGamalError::invalid_argument("ciphertext randomness is required to combine");
        let r1 = ct1.randomness().ok_or_else(missing)?;
        let r2 = ct2.randomness().ok_or_else(missing)?;

        let q = public_key.q();
        let s1 = reindex(&proof1.s, domain, q, rng)?;
        let c1 = reindex(&proof1.c, domain, q, rng)?;
        let s2 = reindex(&proof2.s, domain, q, rng)?;
        let c2 = reindex(&proof2.c, domain, q, rng)?;

        let sum = ct1.operate(ct2);
        let r = r1.to_modulus(q).add(r2);

        let j = match true_index(public_key, sum.big_h(), &r, domain)? {
            Some(j) => j,
            None => {
                debug!("sum of ciphertexts is outside the proof domain");
                0
            }
        };

        // With s = s1 + s2 and c = c1 + c2 the simulated commitment of the sum
        // equals (y1 * y2) / g^(r2*c1 + r1*c2) and (z1 * z2) / (H2^c1 * H1^c2).
        let proof = prove(
            public_key,
            sum.big_g(),
            sum.big_h(),
            domain,
            j,
            &r,
            rng,
            |i, _| Ok((s1[i].add(&s2[i]), c1[i].add(&c2[i]))),
        )?;

        debug!(domain_size = domain.len(), "membership proofs combined");
        Ok(proof)
    }
}

impl fmt::Display for MembershipProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MembershipProof({} branches)", self.len())
    }
}

/// Build a proof where branch `j` is real and every other branch `i` is
/// simulated from the `(s_i, c_i)` pair returned by `simulate`.
#[allow(clippy::too_many_arguments)]
fn prove<R, F>(
    public_key: &PublicKey,
    big_g: &ModInteger,
    big_h: &ModInteger,
    domain: &[ModInteger],
    j: usize,
    r: &ModInteger,
    rng: &mut R,
    mut simulate: F,
) -> Result<MembershipProof>
where
    R: RngCore + CryptoRng,
    F: FnMut(usize, &mut R) -> Result<(ModInteger, ModInteger)>,
{
    let p = public_key.p();
    let q = public_key.q();
    let n = domain.len();
    let big_g = big_g.to_modulus(p);
    let big_h = big_h.to_modulus(p);
    let zero = ModInteger::zero().to_modulus(q);

    let t = ModInteger::random(q, rng)?;

    let mut y = Vec::with_capacity(n);
    let mut z = Vec::with_capacity(n);
    let mut s = Vec::with_capacity(n);
    let mut c = Vec::with_capacity(n);

    for (i, d) in domain.iter().enumerate() {
        if i == j {
            y.push(public_key.g().pow(&t)?);
            z.push(public_key.h().pow(&t)?);
            s.push(zero.clone());
            c.push(zero.clone());
        } else {
            let (s_i, c_i) = simulate(i, rng)?;
            let s_i = s_i.to_modulus(q);
            let c_i = c_i.to_modulus(q);
            let (y_i, z_i) = simulated_commitment(public_key, &big_g, &big_h, d, &s_i, &c_i)?;
            y.push(y_i);
            z.push(z_i);
            s.push(s_i);
            c.push(c_i);
        }
    }

    let master = challenge(public_key, &big_g, &big_h, &y, &z);
    // c_j is still zero, so this is the sum over the simulated branches
    let others = c.iter().fold(zero, |acc, c_i| acc.add(c_i));
    let c_j = master.subtract(&others);
    let s_j = c_j.multiply(r).add(&t);
    c[j] = c_j;
    s[j] = s_j;

    Ok(MembershipProof::new(p.clone(), q.clone(), y, z, s, c))
}

/// `y = g^s * G^-c` and `z = h^s * (H / g^d)^-c`
fn simulated_commitment(
    public_key: &PublicKey,
    big_g: &ModInteger,
    big_h: &ModInteger,
    d: &ModInteger,
    s: &ModInteger,
    c: &ModInteger,
) -> Result<(ModInteger, ModInteger)> {
    let minus_c = c.without_modulus().negate();

    let y = public_key.g().pow(s)?.multiply(&big_g.pow(&minus_c)?);

    let h_over_g_d = big_h.divide(&public_key.g().pow(d)?)?;
    let z = public_key.h().pow(s)?.multiply(&h_over_g_d.pow(&minus_c)?);

    Ok((y, z))
}

/// Hash `g, h, G, H, y_0, z_0, ..., y_{n-1}, z_{n-1}` into a challenge mod `q`
fn challenge(
    public_key: &PublicKey,
    big_g: &ModInteger,
    big_h: &ModInteger,
    y: &[ModInteger],
    z: &[ModInteger],
) -> ModInteger {
    let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
    transcript.append_all([public_key.g(), public_key.h(), big_g, big_h]);
    for (y_i, z_i) in y.iter().zip(z) {
        transcript.append(y_i);
        transcript.append(z_i);
    }
    transcript.challenge(public_key.q())
}

/// Map sub-proof entries onto a combined domain: value `d` takes entry `d`
/// when the sub-proof has one, a fresh random value otherwise.
fn reindex<R: RngCore + CryptoRng>(
    values: &[ModInteger],
    domain: &[ModInteger],
    q: &ModInteger,
    rng: &mut R,
) -> Result<Vec<ModInteger>> {
    domain
        .iter()
        .map(|d| {
            match d.to_u64().and_then(|i| values.get(usize::try_from(i).ok()?)) {
                Some(v) => Ok(v.to_modulus(q)),
                None => ModInteger::random(q, rng),
            }
        })
        .collect()
}

/// The index `j` with `H / g^(d_j) == h^r`, if any
fn true_index(
    public_key: &PublicKey,
    big_h: &ModInteger,
    r: &ModInteger,
    domain: &[ModInteger],
) -> Result<Option<usize>> {
    let big_h = big_h.to_modulus(public_key.p());
    let h_r = public_key.h().pow(r)?;

    for (i, d) in domain.iter().enumerate() {
        if big_h.divide(&public_key.g().pow(d)?)? == h_r {
            return Ok(Some(i));
        }
    }
    Ok(None)
}
