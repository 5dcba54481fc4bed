//! Group parameters and generator discovery for Z_p*

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive};
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, info, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::types::{DegeneratePolicy, ElGamalConfig, FactorStrategy};
use crate::utils::{
    divisors, generate_prime, generate_safe_prime, is_probable_prime, is_safe_prime_shape, mod_exp,
    prime_factors, DEFAULT_PRIMALITY_ROUNDS,
};

/// Draws allowed in `Group::random_generator` before giving up
const MAX_GENERATOR_DRAWS: usize = 10_000;

/// Largest plain prime `Group::generate` uses. Trial division up to 2^16
/// fully factors any p-1 below 2^32.
const PLAIN_PRIME_MAX_BITS: u64 = 32;

/// Public group parameters shared by every party: modulus `p` and generator `g`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub(crate) p: BigUint,
    pub(crate) g: BigUint,
}

impl Group {
    /// Create group parameters, checking `p > 2`, the 2q+1 shape and `1 < g < p`.
    ///
    /// `g` is not checked to be a generator; see [`Group::new_verified`].
    pub fn new(p: BigUint, g: BigUint) -> Result<Self> {
        if p <= BigUint::from(2u32) {
            return Err(ElGamalError::InvalidParameter(
                "Modulus p must be > 2".to_string(),
            ));
        }

        if !is_safe_prime_shape(&p) {
            return Err(ElGamalError::NotSafePrimeShape(p));
        }

        if g <= BigUint::one() || g >= p {
            return Err(ElGamalError::InvalidParameter(
                "Generator g must be in range (1, p)".to_string(),
            ));
        }

        Ok(Group { p, g })
    }

    /// Like [`Group::new`], and additionally require `g` to have order p-1
    pub fn new_verified(p: BigUint, g: BigUint) -> Result<Self> {
        let group = Self::new(p, g)?;
        let factors = prime_factors(&(&group.p - 1u32), DEFAULT_PRIMALITY_ROUNDS)?;

        if !is_generator(&group.g, &group.p, &factors) {
            return Err(ElGamalError::InvalidParameter(format!(
                "{} does not generate Z_{}*",
                group.g, group.p
            )));
        }

        Ok(group)
    }

    /// Pick a random prime of `bit_size` bits and a random generator for it
    pub fn generate<R: RngCore + CryptoRng>(bit_size: u64, rng: &mut R) -> Result<Self> {
        Self::generate_with_config(bit_size, &ElGamalConfig::default(), rng)
    }

    /// Generate group parameters.
    ///
    /// Moduli up to 32 bits are plain primes; larger ones are safe primes so
    /// that p-1 = 2q factors. Either way the generator is drawn by rejection
    /// sampling, which is uniform over the generators of Z_p*.
    #[instrument(skip(config, rng))]
    pub fn generate_with_config<R: RngCore + CryptoRng>(
        bit_size: u64,
        config: &ElGamalConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let rounds = config.primality_test_rounds;
        let p = if bit_size <= PLAIN_PRIME_MAX_BITS {
            generate_prime(bit_size, rounds, rng)?
        } else {
            generate_safe_prime(bit_size, rounds, rng)?.0
        };
        let g = sample_generator(&p, rounds, rng)?;

        info!(p = %p, g = %g, "generated group parameters");
        Self::new(p, g)
    }

    /// Sample candidates in [2, p-1] until one passes the order test.
    ///
    /// Requires p-1 to factor (always the case for safe primes and for
    /// moduli below 2^32).
    pub fn random_generator<R: RngCore + CryptoRng>(p: &BigUint, rng: &mut R) -> Result<BigUint> {
        sample_generator(p, DEFAULT_PRIMALITY_ROUNDS, rng)
    }

    /// Get the prime modulus
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Get the generator
    pub fn generator(&self) -> &BigUint {
        &self.g
    }

    /// Get the bit size of the modulus
    pub fn bit_size(&self) -> u64 {
        self.p.bits()
    }
}

fn sample_generator<R: RngCore + CryptoRng>(
    p: &BigUint,
    rounds: usize,
    rng: &mut R,
) -> Result<BigUint> {
    if !is_safe_prime_shape(p) {
        return Err(ElGamalError::NotSafePrimeShape(p.clone()));
    }
    if p <= &BigUint::from(2u32) {
        return Err(ElGamalError::InvalidParameter(
            "Modulus p must be > 2".to_string(),
        ));
    }

    let factors = prime_factors(&(p - 1u32), rounds)?;
    let two = BigUint::from(2u32);

    for draw in 1..=MAX_GENERATOR_DRAWS {
        let candidate = rng.gen_biguint_range(&two, p);
        if is_generator(&candidate, p, &factors) {
            debug!(draws = draw, "sampled generator");
            return Ok(candidate);
        }
    }

    Err(ElGamalError::CryptoError(format!(
        "no generator found after {} draws",
        MAX_GENERATOR_DRAWS
    )))
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group(p = {}, g = {})", self.p, self.g)
    }
}

/// Order test for a single candidate.
///
/// `factors` are nontrivial divisors of p-1 (all of them, or just the
/// distinct primes). The candidate passes iff `c^((p-1)/f) mod p != 1` for
/// every `f`. The identity never passes; an empty factor list accepts every
/// other element. Moduli below 3 have no generators.
pub fn is_generator(candidate: &BigUint, p: &BigUint, factors: &[BigUint]) -> bool {
    if p <= &BigUint::from(2u32) {
        return false;
    }

    let c = candidate % p;
    if c <= BigUint::one() {
        return false;
    }

    let p_minus_1 = p - 1u32;
    factors
        .iter()
        .all(|f| !mod_exp(&c, &(&p_minus_1 / f), p).is_one())
}

/// Every generator of Z_p*, ascending, using the default configuration
pub fn find_generators(p: &BigUint) -> Result<Vec<BigUint>> {
    find_generators_with_config(p, &ElGamalConfig::default())
}

/// Every generator of Z_p*, ascending.
///
/// Scans all candidates in [1, p-1], so this is bounded by
/// `config.max_search_modulus_bits`.
#[instrument(skip(config), fields(strategy = ?config.factor_strategy, parallel = config.parallel_search))]
pub fn find_generators_with_config(p: &BigUint, config: &ElGamalConfig) -> Result<Vec<BigUint>> {
    if !is_safe_prime_shape(p) {
        return Err(ElGamalError::NotSafePrimeShape(p.clone()));
    }
    if p <= &BigUint::from(2u32) {
        return Err(ElGamalError::InvalidParameter(
            "Modulus p must be > 2".to_string(),
        ));
    }

    let max = config.max_search_modulus_bits.min(64);
    let bits = p.bits();
    let p_u64 = match p.to_u64() {
        Some(p_u64) if bits <= max => p_u64,
        _ => return Err(ElGamalError::ModulusTooLarge { bits, max }),
    };

    let p_minus_1 = p - 1u32;

    // p-1 prime: only 1 and p-1 divide it
    if is_probable_prime(&p_minus_1, config.primality_test_rounds) {
        return match config.degenerate_policy {
            DegeneratePolicy::Reject => Err(ElGamalError::DegenerateFactorSet(p.clone())),
            DegeneratePolicy::AllNonIdentity => {
                debug!("p-1 is prime, every non-identity element generates");
                Ok((2..p_u64).map(BigUint::from).collect())
            }
        };
    }

    let factors = match config.factor_strategy {
        FactorStrategy::Enumerate => {
            let mut all = divisors(&p_minus_1);
            // 1 and p-1 tell us nothing: c^(p-1) = 1 always, c^1 = 1 only for c = 1
            all.retain(|d| !d.is_one() && d != &p_minus_1);
            all
        }
        FactorStrategy::PrimeFactors => prime_factors(&p_minus_1, config.primality_test_rounds)?,
    };
    debug!(factors = factors.len(), "testing candidates");

    let generators: Vec<BigUint> = if config.parallel_search {
        (1..p_u64)
            .into_par_iter()
            .map(BigUint::from)
            .filter(|c| is_generator(c, p, &factors))
            .collect()
    } else {
        (1..p_u64)
            .map(BigUint::from)
            .filter(|c| is_generator(c, p, &factors))
            .collect()
    };

    info!(count = generators.len(), "found generators");
    Ok(generators)
}
