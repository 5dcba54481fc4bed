//! Number-theoretic helpers: modular arithmetic, primality and factoring

use crate::error::{ElGamalError, Result};
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, Rng};
use tracing::{debug, instrument, trace};

/// Trial division stops here; whatever cofactor is left must be prime.
const TRIAL_DIVISION_BOUND: u64 = 1 << 16;

/// Miller-Rabin rounds used when no configuration is supplied
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 20;

/// Modular exponentiation: base^exp mod modulus
pub fn mod_exp(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    base.modpow(exp, modulus)
}

/// Compute modular inverse using extended Euclidean algorithm
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }

    let (gcd, x) = extended_gcd(
        &BigInt::from_biguint(Sign::Plus, a % m),
        &BigInt::from_biguint(Sign::Plus, m.clone()),
    );

    if !gcd.is_one() {
        return None;
    }

    // x may be negative; shift it into [0, m)
    let m_bigint = BigInt::from_biguint(Sign::Plus, m.clone());
    x.mod_floor(&m_bigint).to_biguint()
}

/// Iterative extended Euclid, returning (gcd, x) with a*x ≡ gcd (mod b)
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

/// Check that `p` has the shape 2q + 1 for an integer q.
///
/// Only the shape is checked: primality of `p` (and of `q`) is the caller's
/// responsibility.
pub fn is_safe_prime_shape(p: &BigUint) -> bool {
    if p.is_zero() {
        return false;
    }
    (p - BigUint::one()).is_even()
}

/// Check that both `p` and `(p-1)/2` are probable primes
pub fn is_safe_prime(p: &BigUint, rounds: usize) -> bool {
    if !is_safe_prime_shape(p) || !is_probable_prime(p, rounds) {
        return false;
    }
    let q = (p - BigUint::one()) >> 1;
    is_probable_prime(&q, rounds)
}

/// Miller-Rabin primality test
pub fn is_probable_prime(n: &BigUint, k: usize) -> bool {
    if n <= &BigUint::one() {
        return false;
    }

    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    let mut rng = thread_rng();
    let n_minus_1 = n - BigUint::one();
    let (s, d) = factor_powers_of_two(&n_minus_1);

    'witness: for _ in 0..k {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 0..s - 1 {
            x = mod_exp(&x, &two, n);
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

    while d.is_even() && !d.is_zero() {
        d >>= 1;
        s += 1;
    }

    (s, d)
}

/// Every divisor of `n` in [1, n], by trial division over the whole range.
///
/// O(n): only usable for small demonstration moduli.
pub fn divisors(n: &BigUint) -> Vec<BigUint> {
    let mut found = Vec::new();
    let mut i = BigUint::one();

    while &i <= n {
        if (n % &i).is_zero() {
            found.push(i.clone());
        }
        i += 1u32;
    }

    found
}

/// Distinct prime factors of `n`, ascending.
///
/// Trial division runs up to √n (capped at 2^16); a leftover cofactor is
/// accepted only if it passes `rounds` Miller-Rabin rounds.
#[instrument(level = "debug", skip_all, fields(bits = n.bits()))]
pub fn prime_factors(n: &BigUint, rounds: usize) -> Result<Vec<BigUint>> {
    let mut factors = Vec::new();
    if n <= &BigUint::one() {
        return Ok(factors);
    }

    let mut rest = n.clone();
    let mut d = BigUint::from(2u32);
    let bound = BigUint::from(TRIAL_DIVISION_BOUND);

    while &d * &d <= rest && d <= bound {
        if (&rest % &d).is_zero() {
            trace!(factor = %d, "found small factor");
            while (&rest % &d).is_zero() {
                rest /= &d;
            }
            factors.push(d.clone());
        }
        d += if d == BigUint::from(2u32) { 1u32 } else { 2u32 };
    }

    if !rest.is_one() {
        // rest is prime when trial division covered its square root
        if &d * &d > rest || is_probable_prime(&rest, rounds) {
            factors.push(rest);
        } else {
            return Err(ElGamalError::CryptoError(format!(
                "could not factor {} bits of p-1 by trial division",
                rest.bits()
            )));
        }
    }

    factors.sort();
    debug!(count = factors.len(), "factored p-1");
    Ok(factors)
}

/// Generate a prime number of the specified bit size (not necessarily safe)
pub fn generate_prime<R: Rng + ?Sized>(
    bit_size: u64,
    rounds: usize,
    rng: &mut R,
) -> Result<BigUint> {
    if bit_size < 3 {
        return Err(ElGamalError::InvalidParameter(format!(
            "prime size must be at least 3 bits, got {}",
            bit_size
        )));
    }

    let max_iterations = 100000;

    for _ in 0..max_iterations {
        // Random odd number with exactly bit_size bits
        let mut candidate = rng.gen_biguint(bit_size);
        candidate |= BigUint::one();
        candidate |= BigUint::one() << (bit_size - 1);

        if is_probable_prime(&candidate, rounds) {
            return Ok(candidate);
        }
    }

    Err(ElGamalError::CryptoError(format!(
        "Failed to generate {}-bit prime after {} iterations",
        bit_size, max_iterations
    )))
}

/// Generate a safe prime (p = 2q + 1 where q is also prime), returning (p, q)
#[instrument(level = "debug", skip(rng))]
pub fn generate_safe_prime<R: Rng + ?Sized>(
    bit_size: u64,
    rounds: usize,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    if bit_size < 4 {
        return Err(ElGamalError::InvalidParameter(format!(
            "safe prime size must be at least 4 bits, got {}",
            bit_size
        )));
    }

    let max_iterations = 1_000_000;

    for _ in 0..max_iterations {
        let q = generate_prime(bit_size - 1, rounds, rng)?;
        let p = &q * 2u32 + 1u32;

        if p.bits() == bit_size && is_probable_prime(&p, rounds) {
            return Ok((p, q));
        }
    }

    Err(ElGamalError::CryptoError(format!(
        "Failed to generate {}-bit safe prime after {} iterations",
        bit_size, max_iterations
    )))
}
