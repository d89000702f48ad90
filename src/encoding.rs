//! Compact text encodings
//!
//! Every value is introduced by a single upper-case tag letter:
//!
//! - public key `P<p>Q<q>G<g>H<h>` and private key `P<p>Q<q>G<g>X<x>`, decimal
//! - ciphertext `G<value>M<modulus>H<value>M<modulus>`, base 36
//! - membership proof `P<p>` followed by all `Y`, `Z`, `S` and `C` entries, base 36
//!
//! Base-36 digits are written in lower case, so they never clash with a tag.
//! Encryption randomness is never encoded.

use std::fmt::Write;

use num_bigint::BigUint;

use crate::arithmetic::ModInteger;
use crate::error::{ElGamalError, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::proofs::MembershipProof;
use crate::types::CipherText;

const KEY_RADIX: u32 = 10;
const RADIX: u32 = 36;

/// Split `input` into `(tag, value)` pairs. Tags are the given letters; every
/// tag must be followed by a non-empty value.
fn tokenize<'a>(input: &'a str, tags: &[char]) -> Result<Vec<(char, &'a str)>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while let Some(tag) = rest.chars().next() {
        if !tags.contains(&tag) {
            return Err(ElGamalError::invalid_argument(format!(
                "unexpected character '{}', expected one of {:?}",
                tag, tags
            )));
        }
        rest = &rest[tag.len_utf8()..];

        let end = rest.find(|c: char| tags.contains(&c)).unwrap_or(rest.len());
        if end == 0 {
            return Err(ElGamalError::invalid_argument(format!("missing value after '{}'", tag)));
        }
        tokens.push((tag, &rest[..end]));
        rest = &rest[end..];
    }

    if tokens.is_empty() {
        return Err(ElGamalError::invalid_argument("no tokens found"));
    }
    Ok(tokens)
}

fn parse(value: &str, radix: u32) -> Result<BigUint> {
    // `parse_bytes` accepts `_` separators, which are not part of the format
    if !value.chars().all(|c| c.is_digit(radix)) {
        return Err(ElGamalError::invalid_argument(format!("invalid digits in '{}'", value)));
    }
    BigUint::parse_bytes(value.as_bytes(), radix)
        .ok_or_else(|| ElGamalError::invalid_argument(format!("invalid digits in '{}'", value)))
}

/// Parse tokens that must appear exactly in the order of `expected`
fn parse_sequence(input: &str, expected: &[char], radix: u32) -> Result<Vec<BigUint>> {
    let mut tags = expected.to_vec();
    tags.dedup();
    let tokens = tokenize(input, &tags)?;

    if tokens.len() != expected.len() {
        return Err(ElGamalError::invalid_argument(format!(
            "expected {} values, found {}",
            expected.len(),
            tokens.len()
        )));
    }

    tokens
        .iter()
        .zip(expected)
        .map(|(&(tag, value), &want)| {
            if tag != want {
                return Err(ElGamalError::invalid_argument(format!(
                    "expected tag '{}', found '{}'",
                    want, tag
                )));
            }
            parse(value, radix)
        })
        .collect()
}

fn to_radix(value: &ModInteger, radix: u32) -> String {
    value.to_str_radix(radix)
}

pub fn encode_public_key(public_key: &PublicKey) -> String {
    format!(
        "P{}Q{}G{}H{}",
        to_radix(public_key.p(), KEY_RADIX),
        to_radix(public_key.q(), KEY_RADIX),
        to_radix(public_key.g(), KEY_RADIX),
        to_radix(public_key.h(), KEY_RADIX),
    )
}

/// Decode and validate a public key
pub fn decode_public_key(input: &str) -> Result<PublicKey> {
    let mut values = parse_sequence(input, &['P', 'Q', 'G', 'H'], KEY_RADIX)?.into_iter();
    match (values.next(), values.next(), values.next(), values.next()) {
        (Some(p), Some(q), Some(g), Some(h)) => PublicKey::new(p, q, g, h),
        _ => Err(ElGamalError::invalid_argument("incomplete public key")),
    }
}

pub fn encode_private_key(private_key: &PrivateKey) -> String {
    format!(
        "P{}Q{}G{}X{}",
        to_radix(private_key.p(), KEY_RADIX),
        to_radix(private_key.q(), KEY_RADIX),
        to_radix(private_key.g(), KEY_RADIX),
        to_radix(private_key.x(), KEY_RADIX),
    )
}

/// Decode and validate a private key
pub fn decode_private_key(input: &str) -> Result<PrivateKey> {
    let mut values = parse_sequence(input, &['P', 'Q', 'G', 'X'], KEY_RADIX)?.into_iter();
    match (values.next(), values.next(), values.next(), values.next()) {
        (Some(p), Some(q), Some(g), Some(x)) => PrivateKey::new(p, q, g, x),
        _ => Err(ElGamalError::invalid_argument("incomplete private key")),
    }
}

pub fn encode_ciphertext(ciphertext: &CipherText) -> String {
    let modulus = |m: &ModInteger| m.modulus().to_str_radix(RADIX);
    format!(
        "G{}M{}H{}M{}",
        to_radix(ciphertext.big_g(), RADIX),
        modulus(ciphertext.big_g()),
        to_radix(ciphertext.big_h(), RADIX),
        modulus(ciphertext.big_h()),
    )
}

/// Decode a ciphertext; the result carries no randomness
pub fn decode_ciphertext(input: &str) -> Result<CipherText> {
    let mut values = parse_sequence(input, &['G', 'M', 'H', 'M'], RADIX)?.into_iter();
    match (values.next(), values.next(), values.next(), values.next()) {
        (Some(g), Some(g_mod), Some(h), Some(h_mod)) => Ok(CipherText::new(
            ModInteger::new(g, g_mod),
            ModInteger::new(h, h_mod),
        )),
        _ => Err(ElGamalError::invalid_argument("incomplete ciphertext")),
    }
}

pub fn encode_proof(proof: &MembershipProof) -> String {
    let mut out = format!("P{}", to_radix(proof.p(), RADIX));
    for (tag, values) in [('Y', proof.y()), ('Z', proof.z()), ('S', proof.s()), ('C', proof.c())] {
        for value in values {
            // writing to a String cannot fail
            let _ = write!(out, "{}{}", tag, to_radix(value, RADIX));
        }
    }
    out
}

/// Decode a membership proof, deriving `q = (p - 1) / 2`
pub fn decode_proof(input: &str) -> Result<MembershipProof> {
    let tokens = tokenize(input, &['P', 'Y', 'Z', 'S', 'C'])?;

    let (tag, p) = tokens[0];
    if tag != 'P' {
        return Err(ElGamalError::invalid_argument(format!(
            "expected tag 'P', found '{}'",
            tag
        )));
    }
    let p = parse(p, RADIX)?;
    if p < BigUint::from(5u32) {
        return Err(ElGamalError::invalid_argument(format!("invalid proof modulus {}", p)));
    }
    let q = (&p - 1u32) / 2u32;

    let (mut y, mut z, mut s, mut c) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for &(tag, value) in &tokens[1..] {
        let value = ModInteger::from(parse(value, RADIX)?);
        match tag {
            'Y' => y.push(value),
            'Z' => z.push(value),
            'S' => s.push(value),
            'C' => c.push(value),
            _ => {
                return Err(ElGamalError::invalid_argument(format!(
                    "unexpected tag '{}'",
                    tag
                )))
            }
        }
    }

    let n = c.len();
    if y.len() != n || z.len() != n || s.len() != n {
        return Err(ElGamalError::invalid_argument(format!(
            "mismatched proof lengths: y {}, z {}, s {}, c {}",
            y.len(),
            z.len(),
            s.len(),
            n
        )));
    }

    Ok(MembershipProof::new(
        ModInteger::from(p),
        ModInteger::from(q),
        y,
        z,
        s,
        c,
    ))
}
