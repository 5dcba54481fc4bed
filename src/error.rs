//! Error types for the ElGamal library

use num_bigint::BigUint;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ElGamalError>;

#[derive(Error, Debug)]
pub enum ElGamalError {
    #[error("Modulus {0} is not of the form 2q+1")]
    NotSafePrimeShape(BigUint),

    #[error("p-1 has no nontrivial factors for modulus {0}")]
    DegenerateFactorSet(BigUint),

    #[error("Plaintext too large for modulus")]
    PlaintextTooLarge,

    #[error("Decrypted plaintext is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Failed to compute modular inverse")]
    ModularInverseError,

    #[error("Modulus of {bits} bits is too large for exhaustive generator search (max {max})")]
    ModulusTooLarge { bits: u64, max: u64 },

    #[error("Empty list provided for batch operation")]
    EmptyBatch,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cryptographic error: {0}")]
    CryptoError(String),
}
