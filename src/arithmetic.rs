//! Modular integer arithmetic
//!
//! [`ModInteger`] pairs a value with a modulus. A modulus of zero means plain
//! integer arithmetic. With a non-zero modulus the value is always kept in
//! `[0, modulus)`, so equality and hashing only ever look at the reduced value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::{CryptoRng, RngCore};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::utils::mod_inverse;

/// An integer together with the modulus it lives under.
///
/// Binary operations take the modulus of the left operand.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "RawModInteger", into = "RawModInteger")
)]
pub struct ModInteger {
    value: BigInt,
    modulus: BigInt,
}

#[cfg(feature = "serde")]
#[derive(Clone, Serialize, Deserialize)]
struct RawModInteger {
    value: BigInt,
    modulus: BigInt,
}

#[cfg(feature = "serde")]
impl From<RawModInteger> for ModInteger {
    fn from(raw: RawModInteger) -> Self {
        ModInteger::from_parts(raw.value, raw.modulus.abs())
    }
}

#[cfg(feature = "serde")]
impl From<ModInteger> for RawModInteger {
    fn from(m: ModInteger) -> Self {
        RawModInteger {
            value: m.value,
            modulus: m.modulus,
        }
    }
}

fn reduce(value: BigInt, modulus: &BigInt) -> BigInt {
    if modulus.is_zero() {
        value
    } else {
        value.mod_floor(modulus)
    }
}

impl ModInteger {
    /// Create `value mod modulus`. A zero modulus keeps the value as is.
    pub fn new(value: impl Into<BigInt>, modulus: BigUint) -> Self {
        Self::from_parts(value.into(), BigInt::from_biguint(Sign::Plus, modulus))
    }

    /// A plain integer (modulus zero).
    pub fn integer(value: impl Into<BigInt>) -> Self {
        ModInteger {
            value: value.into(),
            modulus: BigInt::zero(),
        }
    }

    pub(crate) fn from_parts(value: BigInt, modulus: BigInt) -> Self {
        debug_assert!(!modulus.is_negative());
        ModInteger {
            value: reduce(value, &modulus),
            modulus,
        }
    }

    pub fn zero() -> Self {
        Self::integer(0u32)
    }

    pub fn one() -> Self {
        Self::integer(1u32)
    }

    pub fn two() -> Self {
        Self::integer(2u32)
    }

    /// The (reduced) value.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// The modulus, zero for plain integers.
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn has_modulus(&self) -> bool {
        !self.modulus.is_zero()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// The same value, reduced under the modulus given by the *value* of `modulus`.
    pub fn to_modulus(&self, modulus: &ModInteger) -> ModInteger {
        Self::from_parts(self.value.clone(), modulus.value.abs())
    }

    /// The value as a plain integer, dropping the modulus.
    pub fn without_modulus(&self) -> ModInteger {
        Self::integer(self.value.clone())
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    pub fn to_biguint(&self) -> Option<BigUint> {
        self.value.to_biguint()
    }

    pub fn to_str_radix(&self, radix: u32) -> String {
        self.value.to_str_radix(radix)
    }

    pub fn add(&self, other: &ModInteger) -> ModInteger {
        Self::from_parts(&self.value + &other.value, self.modulus.clone())
    }

    pub fn subtract(&self, other: &ModInteger) -> ModInteger {
        Self::from_parts(&self.value - &other.value, self.modulus.clone())
    }

    /// Additive inverse: `modulus - value` under a modulus, plain negation otherwise.
    pub fn negate(&self) -> ModInteger {
        if self.has_modulus() {
            Self::from_parts(&self.modulus - &self.value, self.modulus.clone())
        } else {
            Self::integer(-&self.value)
        }
    }

    pub fn multiply(&self, other: &ModInteger) -> ModInteger {
        Self::from_parts(&self.value * &other.value, self.modulus.clone())
    }

    /// Multiply by the modular inverse of `other`, or truncating division without a modulus.
    pub fn divide(&self, other: &ModInteger) -> Result<ModInteger> {
        if !self.has_modulus() {
            if other.value.is_zero() {
                return Err(ElGamalError::arithmetic("division by zero"));
            }
            return Ok(Self::integer(&self.value / &other.value));
        }

        let inverse = mod_inverse(&other.value, &self.modulus).ok_or_else(|| {
            ElGamalError::arithmetic(format!(
                "{} has no inverse modulo {}",
                other.value, self.modulus
            ))
        })?;

        Ok(Self::from_parts(&self.value * inverse, self.modulus.clone()))
    }

    /// `self^exponent`, modular when a modulus is set.
    ///
    /// A negative exponent inverts the base first. Without a modulus the
    /// exponent has to be a non-negative value that fits in a `u32`.
    pub fn pow(&self, exponent: &ModInteger) -> Result<ModInteger> {
        if !self.has_modulus() {
            let e = exponent.value.to_u32().ok_or_else(|| {
                ElGamalError::invalid_argument(format!(
                    "exponent {} out of range for plain integer power",
                    exponent.value
                ))
            })?;
            return Ok(Self::integer(self.value.pow(e)));
        }

        let value = if exponent.value.is_negative() {
            let inverse = mod_inverse(&self.value, &self.modulus).ok_or_else(|| {
                ElGamalError::arithmetic(format!(
                    "{} has no inverse modulo {}",
                    self.value, self.modulus
                ))
            })?;
            inverse.modpow(&-&exponent.value, &self.modulus)
        } else {
            self.value.modpow(&exponent.value, &self.modulus)
        };

        Ok(Self::from_parts(value, self.modulus.clone()))
    }

    /// Reduce the value by `m`, keeping this integer's modulus.
    pub fn modulo(&self, m: &ModInteger) -> Result<ModInteger> {
        if m.value.is_zero() {
            return Err(ElGamalError::arithmetic("reduction modulo zero"));
        }
        Ok(Self::from_parts(
            self.value.mod_floor(&m.value.abs()),
            self.modulus.clone(),
        ))
    }

    /// Uniform draw from `[0, bound - 1]`, carrying `bound` as its modulus.
    ///
    /// Rejection sampling over `bits(bound)`-bit draws.
    pub fn random<R: RngCore + CryptoRng>(bound: &ModInteger, rng: &mut R) -> Result<ModInteger> {
        if bound.value <= BigInt::one() {
            return Err(ElGamalError::invalid_argument(format!(
                "random bound must be greater than 1, got {}",
                bound.value
            )));
        }

        let limit = bound.value.magnitude();
        let bits = limit.bits();
        let mut candidate = rng.gen_biguint(bits);
        while &candidate >= limit {
            candidate = rng.gen_biguint(bits);
        }

        Ok(ModInteger {
            value: BigInt::from_biguint(Sign::Plus, candidate),
            modulus: bound.value.clone(),
        })
    }
}

impl PartialEq for ModInteger {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for ModInteger {}

impl Hash for ModInteger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for ModInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for ModInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_modulus() {
            write!(f, "{} mod {}", self.value, self.modulus)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl From<u32> for ModInteger {
    fn from(value: u32) -> Self {
        Self::integer(value)
    }
}

impl From<u64> for ModInteger {
    fn from(value: u64) -> Self {
        Self::integer(value)
    }
}

impl From<i64> for ModInteger {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<BigUint> for ModInteger {
    fn from(value: BigUint) -> Self {
        Self::integer(value)
    }
}

impl From<BigInt> for ModInteger {
    fn from(value: BigInt) -> Self {
        Self::integer(value)
    }
}

impl<'a> Add<&'a ModInteger> for &'a ModInteger {
    type Output = ModInteger;

    fn add(self, rhs: &'a ModInteger) -> ModInteger {
        ModInteger::add(self, rhs)
    }
}

impl<'a> Sub<&'a ModInteger> for &'a ModInteger {
    type Output = ModInteger;

    fn sub(self, rhs: &'a ModInteger) -> ModInteger {
        self.subtract(rhs)
    }
}

impl<'a> Mul<&'a ModInteger> for &'a ModInteger {
    type Output = ModInteger;

    fn mul(self, rhs: &'a ModInteger) -> ModInteger {
        self.multiply(rhs)
    }
}

impl Neg for &ModInteger {
    type Output = ModInteger;

    fn neg(self) -> ModInteger {
        self.negate()
    }
}
