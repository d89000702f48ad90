//! Polynomials over Z_q and Lagrange combination
//!
//! A secret `x` shared among authorities is the constant term of a polynomial
//! `f`; authority `i` holds `f(i)`. Any `degree + 1` shares recombine `x` in
//! the exponent with the Lagrange coefficients at zero.

use num_bigint::BigInt;
use rand::{CryptoRng, RngCore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polynomial {
    coefficients: Vec<ModInteger>, // [a_0, a_1, ..., a_degree]
    q: ModInteger,
}

impl Polynomial {
    /// Random polynomial of the given degree
    pub fn random<R: RngCore + CryptoRng>(degree: usize, q: &ModInteger, rng: &mut R) -> Result<Self> {
        let coefficients = (0..=degree)
            .map(|_| ModInteger::random(q, rng))
            .collect::<Result<Vec<_>>>()?;
        Self::from_coefficients(coefficients, q)
    }

    /// Random polynomial with a fixed constant term
    pub fn with_constant_term<R: RngCore + CryptoRng>(
        secret: &ModInteger,
        degree: usize,
        q: &ModInteger,
        rng: &mut R,
    ) -> Result<Self> {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(secret.clone());
        for _ in 0..degree {
            coefficients.push(ModInteger::random(q, rng)?);
        }
        Self::from_coefficients(coefficients, q)
    }

    pub fn from_coefficients(coefficients: Vec<ModInteger>, q: &ModInteger) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(ElGamalError::invalid_argument("polynomial needs at least one coefficient"));
        }
        if q.value() <= &BigInt::from(1) {
            return Err(ElGamalError::invalid_argument(format!(
                "polynomial modulus must be greater than 1, got {}",
                q.value()
            )));
        }

        Ok(Polynomial {
            coefficients: coefficients.iter().map(|a| a.to_modulus(q)).collect(),
            q: q.without_modulus(),
        })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[ModInteger] {
        &self.coefficients
    }

    /// The constant term `f(0)`
    pub fn constant_term(&self) -> &ModInteger {
        &self.coefficients[0]
    }

    /// Evaluate `f(x) mod q` (Horner)
    pub fn evaluate(&self, x: &ModInteger) -> ModInteger {
        let x = x.to_modulus(&self.q);
        self.coefficients
            .iter()
            .rev()
            .fold(ModInteger::zero().to_modulus(&self.q), |acc, a| {
                acc.multiply(&x).add(a)
            })
    }

    /// Lagrange coefficients at zero, `λ_i = Π_{j≠i} (0 - x_j) / (x_i - x_j) mod q`,
    /// one per evaluation point
    pub fn lagrange_coefficients(points: &[ModInteger], q: &ModInteger) -> Result<Vec<ModInteger>> {
        if q.value() <= &BigInt::from(1) {
            return Err(ElGamalError::invalid_argument(format!(
                "interpolation modulus must be greater than 1, got {}",
                q.value()
            )));
        }
        let points: Vec<ModInteger> = points.iter().map(|x| x.to_modulus(q)).collect();

        points
            .iter()
            .enumerate()
            .map(|(i, x_i)| {
                let mut numerator = ModInteger::one().to_modulus(q);
                let mut denominator = ModInteger::one().to_modulus(q);

                for (j, x_j) in points.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    if x_i == x_j {
                        return Err(ElGamalError::arithmetic(format!(
                            "duplicate evaluation point {}",
                            x_i.value()
                        )));
                    }
                    numerator = numerator.multiply(&x_j.negate());
                    denominator = denominator.multiply(&x_i.subtract(x_j));
                }

                numerator.divide(&denominator)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::rng;
    use proptest::prelude::*;

    fn q() -> ModInteger {
        // 10007 is prime
        ModInteger::from(10_007u32)
    }

    fn points(xs: &[u64]) -> Vec<ModInteger> {
        xs.iter().map(|&x| ModInteger::from(x)).collect()
    }

    #[test]
    fn test_evaluate() {
        // f(x) = 3 + 2x + x^2
        let f = Polynomial::from_coefficients(points(&[3, 2, 1]), &q()).unwrap();
        assert_eq!(f.degree(), 2);
        assert_eq!(f.evaluate(&ModInteger::zero()), ModInteger::from(3u32));
        assert_eq!(f.evaluate(&ModInteger::from(2u32)), ModInteger::from(11u32));
        assert_eq!(f.evaluate(&ModInteger::from(100u32)), ModInteger::from(10_203u32 % 10_007));
    }

    #[test]
    fn test_single_point_coefficient_is_one() {
        let coefficients = Polynomial::lagrange_coefficients(&points(&[1]), &q()).unwrap();
        assert_eq!(coefficients, vec![ModInteger::one()]);
    }

    #[test]
    fn test_two_points() {
        // λ_1 = 2 / (2 - 1) = 2, λ_2 = 1 / (1 - 2) = -1
        let coefficients = Polynomial::lagrange_coefficients(&points(&[1, 2]), &q()).unwrap();
        assert_eq!(coefficients, vec![ModInteger::two(), ModInteger::from(10_006u32)]);
    }

    #[test]
    fn test_duplicate_points() {
        let err = Polynomial::lagrange_coefficients(&points(&[1, 3, 1]), &q()).unwrap_err();
        assert!(matches!(err, ElGamalError::ArithmeticError(_)));
    }

    #[test]
    fn test_invalid_polynomials() {
        assert!(Polynomial::from_coefficients(vec![], &q()).is_err());
        assert!(Polynomial::from_coefficients(points(&[1]), &ModInteger::one()).is_err());
    }

    #[test]
    fn test_with_constant_term() {
        let secret = ModInteger::from(1234u32);
        let f = Polynomial::with_constant_term(&secret, 3, &q(), &mut rng(61)).unwrap();
        assert_eq!(f.degree(), 3);
        assert_eq!(f.constant_term(), &secret);
        assert_eq!(f.evaluate(&ModInteger::zero()), secret);
    }

    proptest! {
        #[test]
        fn interpolation_recovers_constant_term(degree in 0usize..5, seed in any::<u64>()) {
            let f = Polynomial::random(degree, &q(), &mut rng(seed)).unwrap();
            let xs = points(&(1..=degree as u64 + 1).collect::<Vec<_>>());
            let lambdas = Polynomial::lagrange_coefficients(&xs, &q()).unwrap();

            let recovered = xs
                .iter()
                .zip(&lambdas)
                .fold(ModInteger::zero().to_modulus(&q()), |acc, (x, l)| {
                    acc.add(&f.evaluate(x).multiply(l))
                });

            prop_assert_eq!(&recovered, f.constant_term());
        }
    }
}
