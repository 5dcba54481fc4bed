//! Homomorphic operations on ciphertexts
//!
//! Both components of an ElGamal ciphertext multiply independently, so the
//! component-wise product of ciphertexts under one key pair decrypts to the
//! product of their plaintexts mod p.

use num_bigint::BigUint;

use crate::encryption::ElGamal;
use crate::error::{ElGamalError, Result};
use crate::types::Ciphertext;
use crate::utils::{mod_exp, mod_inverse};

/// Trait for homomorphic operations
pub trait HomomorphicOperations {
    /// Component-wise product: decrypts to m1 * m2 mod p
    fn homomorphic_operation(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext>;

    /// Raise both components to `scalar`: decrypts to m^scalar mod p
    fn homomorphic_scalar_operation(&self, ct: &Ciphertext, scalar: &BigUint)
        -> Result<Ciphertext>;

    /// Multiply by the component-wise inverse: decrypts to m1 * m2^-1 mod p
    fn homomorphic_divide(
        &self,
        ct_numerator: &Ciphertext,
        ct_denominator: &Ciphertext,
    ) -> Result<Ciphertext>;

    /// Product of every ciphertext in the batch
    fn homomorphic_batch_operation(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext>;
}

impl HomomorphicOperations for ElGamal {
    fn homomorphic_operation(&self, ct1: &Ciphertext, ct2: &Ciphertext) -> Result<Ciphertext> {
        let p = &self.group.p;
        let a = (&ct1.a * &ct2.a) % p;
        let b = (&ct1.b * &ct2.b) % p;

        Ok(Ciphertext::new(a, b))
    }

    fn homomorphic_scalar_operation(
        &self,
        ct: &Ciphertext,
        scalar: &BigUint,
    ) -> Result<Ciphertext> {
        let p = &self.group.p;
        let a = mod_exp(&ct.a, scalar, p);
        let b = mod_exp(&ct.b, scalar, p);

        Ok(Ciphertext::new(a, b))
    }

    fn homomorphic_divide(
        &self,
        ct_numerator: &Ciphertext,
        ct_denominator: &Ciphertext,
    ) -> Result<Ciphertext> {
        let p = &self.group.p;

        // Division is multiplication by the modular inverse
        let a_inv = mod_inverse(&ct_denominator.a, p).ok_or(ElGamalError::ModularInverseError)?;
        let b_inv = mod_inverse(&ct_denominator.b, p).ok_or(ElGamalError::ModularInverseError)?;

        let a = (&ct_numerator.a * a_inv) % p;
        let b = (&ct_numerator.b * b_inv) % p;

        Ok(Ciphertext::new(a, b))
    }

    fn homomorphic_batch_operation(&self, ciphertexts: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = ciphertexts.split_first().ok_or(ElGamalError::EmptyBatch)?;

        rest.iter()
            .try_fold(first.clone(), |acc, ct| self.homomorphic_operation(&acc, ct))
    }
}
