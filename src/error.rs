//! Error types for the hevote library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElGamalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElGamalError {
    #[error("Arithmetic error: {0}")]
    ArithmeticError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Search space exhausted: no plaintext found in [0, {bound}]")]
    SearchSpaceExhausted { bound: u64 },

    #[error("Plaintext too large: max is {max}")]
    PlaintextTooLarge { max: u64 },

    #[error("Invalid key size: {0} bits (must be at least {1})")]
    InvalidKeySize(u64, u64),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    #[error("Cryptographic error: {0}")]
    CryptoError(String),
}

impl ElGamalError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        ElGamalError::InvalidArgument(msg.into())
    }

    pub(crate) fn arithmetic(msg: impl Into<String>) -> Self {
        ElGamalError::ArithmeticError(msg.into())
    }
}
