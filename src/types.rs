//! Core types and data structures

use num_bigint::BigUint;
use std::fmt;

use crate::utils::DEFAULT_PRIMALITY_ROUNDS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the `a` component of a ciphertext is produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EphemeralMode {
    /// Textbook variant: `a` is the sender's long-lived public value.
    /// Every message between the same two parties shares the same mask,
    /// so this is only suitable for demonstrating the homomorphism.
    #[default]
    Reused,
    /// Standard ElGamal: a fresh `k` per message, `a = g^k`.
    Fresh,
}

/// What generator search does when p-1 has no nontrivial divisors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DegeneratePolicy {
    /// The group order is prime, so every element except 1 generates it.
    #[default]
    AllNonIdentity,
    /// Report `ElGamalError::DegenerateFactorSet`.
    Reject,
}

/// Which divisors of p-1 the order test runs against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FactorStrategy {
    /// Every nontrivial divisor of p-1, found by trial division over [1, p-1].
    Enumerate,
    /// Only the distinct prime factors r of p-1, testing the exponents (p-1)/r.
    #[default]
    PrimeFactors,
}

impl fmt::Display for EphemeralMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemeralMode::Reused => write!(f, "Reused"),
            EphemeralMode::Fresh => write!(f, "Fresh"),
        }
    }
}

/// ElGamal ciphertext (a, b)
///
/// `a` carries the sender's public value (or an ephemeral `g^k`), `b` is the
/// masked message `m * pub^priv mod p`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ciphertext {
    pub(crate) a: BigUint,
    pub(crate) b: BigUint,
}

impl Ciphertext {
    /// Create a new ciphertext
    pub fn new(a: BigUint, b: BigUint) -> Self {
        Ciphertext { a, b }
    }

    /// Get the sender's public component
    pub fn a(&self) -> &BigUint {
        &self.a
    }

    /// Get the masked message
    pub fn b(&self) -> &BigUint {
        &self.b
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.a.to_bytes_be().len() + self.b.to_bytes_be().len()
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.a, self.b)
    }
}

/// Configuration for ElGamal operations
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElGamalConfig {
    /// Whether ciphertexts reuse the sender's key or draw a fresh ephemeral
    pub ephemeral_mode: EphemeralMode,
    /// Behaviour of generator search when p = 3
    pub degenerate_policy: DegeneratePolicy,
    /// Divisors used by the order test
    pub factor_strategy: FactorStrategy,
    /// Split the candidate scan across the rayon thread pool
    pub parallel_search: bool,
    /// Largest modulus (in bits) accepted by the exhaustive generator search
    pub max_search_modulus_bits: u64,
    /// Number of Miller-Rabin rounds for primality testing
    pub primality_test_rounds: usize,
}

impl Default for ElGamalConfig {
    fn default() -> Self {
        ElGamalConfig {
            ephemeral_mode: EphemeralMode::Reused,
            degenerate_policy: DegeneratePolicy::AllNonIdentity,
            factor_strategy: FactorStrategy::PrimeFactors,
            parallel_search: false,
            max_search_modulus_bits: 20,
            primality_test_rounds: DEFAULT_PRIMALITY_ROUNDS,
        }
    }
}

impl ElGamalConfig {
    pub fn with_ephemeral_mode(mut self, mode: EphemeralMode) -> Self {
        self.ephemeral_mode = mode;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn with_factor_strategy(mut self, strategy: FactorStrategy) -> Self {
        self.factor_strategy = strategy;
        self
    }

    pub fn with_parallel_search(mut self, parallel: bool) -> Self {
        self.parallel_search = parallel;
        self
    }

    pub fn with_max_search_modulus_bits(mut self, bits: u64) -> Self {
        self.max_search_modulus_bits = bits;
        self
    }

    /// Miller-Rabin rounds for prime generation and factoring; at least one
    pub fn with_primality_test_rounds(mut self, rounds: usize) -> Self {
        self.primality_test_rounds = rounds.max(1);
        self
    }
}
