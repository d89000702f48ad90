//! Utility functions for cryptographic operations

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rand::{CryptoRng, RngCore};
use tracing::{trace, warn};

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};

const SMALL_PRIMES: [u32; 24] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Compute modular inverse using the extended Euclidean algorithm
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if m.is_zero() {
        return None;
    }

    let m = m.abs();
    let (gcd, x) = extended_gcd(&a.mod_floor(&m), &m);

    if !gcd.is_one() {
        return None;
    }

    Some(x.mod_floor(&m))
}

/// Extended Euclidean algorithm, returning `(gcd, x)` with `a*x = gcd (mod b)`
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    (old_r, old_s)
}

/// Linear search for the exponent `i` in `[0, bound]` with `base^i == target`.
///
/// Only meant for small plaintext domains: ballot values and vote counts.
pub fn bounded_discrete_log(base: &ModInteger, target: &ModInteger, bound: u64) -> Result<u64> {
    let mut current = ModInteger::from_parts(BigInt::one(), base.modulus().clone());

    for i in 0..=bound {
        if &current == target {
            trace!(steps = i, "discrete log found");
            return Ok(i);
        }
        current = current.multiply(base);
    }

    warn!(bound, "bounded discrete log search exhausted");
    Err(ElGamalError::SearchSpaceExhausted { bound })
}

/// Miller-Rabin primality test
pub fn is_probable_prime<R: RngCore + CryptoRng>(n: &BigUint, rounds: usize, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Factor out powers of 2 from n
pub fn factor_powers_of_two(n: &BigUint) -> (u64, BigUint) {
    let mut s = 0;
    let mut d = n.clone();

    while !d.is_zero() && d.is_even() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

fn has_small_factor(n: &BigUint) -> bool {
    SMALL_PRIMES.iter().any(|&p| {
        let p = BigUint::from(p);
        n != &p && (n % &p).is_zero()
    })
}

/// Generate a safe prime `p = 2q + 1` with `p` of exactly `bit_size` bits
pub fn generate_safe_prime<R: RngCore + CryptoRng>(
    bit_size: u64,
    rounds: usize,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    if bit_size < 8 {
        return Err(ElGamalError::InvalidKeySize(bit_size, 8));
    }

    let max_iterations: u64 = 2_000_000;

    for _ in 0..max_iterations {
        // q has bit_size - 1 bits with the top bit set, so p has exactly bit_size bits
        let mut q = rng.gen_biguint(bit_size - 1);
        q |= BigUint::one();
        q |= BigUint::one() << (bit_size - 2);

        if has_small_factor(&q) {
            continue;
        }

        let p = &q * 2u32 + 1u32;
        if has_small_factor(&p) {
            continue;
        }

        if is_probable_prime(&q, rounds, rng) && is_probable_prime(&p, rounds, rng) {
            return Ok((p, q));
        }
    }

    Err(ElGamalError::CryptoError(format!(
        "Failed to generate {}-bit safe prime after {} iterations",
        bit_size, max_iterations
    )))
}

/// Find a generator of the order-q subgroup of Z_p^* for a safe prime `p = 2q + 1`
pub fn find_subgroup_generator<R: RngCore + CryptoRng>(
    p: &BigUint,
    q: &BigUint,
    rng: &mut R,
) -> BigUint {
    let two = BigUint::from(2u32);
    let p_minus_1 = p - BigUint::one();

    loop {
        // squares generate the quadratic residues, which have order q
        let a = rng.gen_biguint_range(&two, &p_minus_1);
        let g = a.modpow(&two, p);

        if !g.is_one() && g.modpow(q, p).is_one() {
            return g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_mod_inverse() {
        let a = BigInt::from(3);
        let m = BigInt::from(11);
        let inv = mod_inverse(&a, &m).unwrap();

        assert_eq!((a * inv) % m, BigInt::one());
    }

    #[test]
    fn test_mod_inverse_of_negative_value() {
        // -3 = 8 mod 11, and 8 * 7 = 56 = 1 mod 11
        let inv = mod_inverse(&BigInt::from(-3), &BigInt::from(11)).unwrap();
        assert_eq!(inv, BigInt::from(7));
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert!(mod_inverse(&BigInt::from(4), &BigInt::from(12)).is_none());
        assert!(mod_inverse(&BigInt::from(0), &BigInt::from(11)).is_none());
        assert!(mod_inverse(&BigInt::from(3), &BigInt::from(0)).is_none());
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        for prime in [2u32, 3, 5, 7, 11, 13, 7919] {
            assert!(is_probable_prime(&BigUint::from(prime), 20, &mut rng));
        }

        for composite in [0u32, 1, 4, 6, 8, 9, 10, 12, 15, 561] {
            assert!(!is_probable_prime(&BigUint::from(composite), 20, &mut rng));
        }
    }

    #[test]
    fn test_safe_prime_generation() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let (p, q) = generate_safe_prime(64, 20, &mut rng).unwrap();

        assert_eq!(p, &q * 2u32 + 1u32);
        assert_eq!(p.bits(), 64);
        assert!(is_probable_prime(&p, 20, &mut rng));
        assert!(is_probable_prime(&q, 20, &mut rng));
    }

    #[test]
    fn test_subgroup_generator() {
        // 23 = 2 * 11 + 1
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let p = BigUint::from(23u32);
        let q = BigUint::from(11u32);
        let g = find_subgroup_generator(&p, &q, &mut rng);

        assert!(!g.is_one());
        assert!(g.modpow(&q, &p).is_one());
    }

    #[test]
    fn test_bounded_discrete_log() {
        let g = ModInteger::new(4, BigUint::from(23u32));
        let target = g.pow(&ModInteger::integer(7)).unwrap();

        assert_eq!(bounded_discrete_log(&g, &target, 10).unwrap(), 7);
        assert_eq!(
            bounded_discrete_log(&g, &target, 3).unwrap_err(),
            ElGamalError::SearchSpaceExhausted { bound: 3 }
        );
    }
}
