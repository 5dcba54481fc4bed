//! Core ElGamal encryption and decryption operations

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::trace;

use crate::codec::{decode_text, encode_text_for};
use crate::error::{ElGamalError, Result};
use crate::group::Group;
use crate::keys::{KeyPair, PrivateKey};
use crate::types::{Ciphertext, ElGamalConfig, EphemeralMode};
use crate::utils::{mod_exp, mod_inverse};

/// Mask a message: b = m * pub^priv mod p.
///
/// Rejects `m >= p` rather than letting the reduction corrupt it.
pub fn encrypt(m: &BigUint, public: &BigUint, private: &BigUint, p: &BigUint) -> Result<BigUint> {
    if m >= p {
        return Err(ElGamalError::PlaintextTooLarge);
    }

    let shared = mod_exp(public, private, p);
    Ok((m * shared) % p)
}

/// Unmask a ciphertext: m = b * (a^priv)^-1 mod p
pub fn decrypt(ciphertext: &Ciphertext, private: &BigUint, p: &BigUint) -> Result<BigUint> {
    let shared = mod_exp(&ciphertext.a, private, p);
    let shared_inv = mod_inverse(&shared, p).ok_or(ElGamalError::ModularInverseError)?;

    Ok((&ciphertext.b * shared_inv) % p)
}

/// ElGamal cipher bound to one set of group parameters
#[derive(Clone, Debug)]
pub struct ElGamal {
    pub(crate) group: Group,
    config: ElGamalConfig,
}

impl ElGamal {
    /// Create a new ElGamal instance with the default configuration
    pub fn new(group: Group) -> Self {
        Self::with_config(group, ElGamalConfig::default())
    }

    /// Create a new ElGamal instance with custom configuration
    pub fn with_config(group: Group, config: ElGamalConfig) -> Self {
        ElGamal { group, config }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Get the configuration
    pub fn config(&self) -> &ElGamalConfig {
        &self.config
    }

    /// Textbook encryption reusing the sender's key pair: a = sender's y,
    /// b = m * recipient^x mod p.
    pub fn encrypt_as_pair(
        &self,
        plaintext: &BigUint,
        recipient: &BigUint,
        sender: &KeyPair,
    ) -> Result<Ciphertext> {
        let b = encrypt(plaintext, recipient, &sender.private.x, &self.group.p)?;
        Ok(Ciphertext::new(sender.public_value().clone(), b))
    }

    /// Standard encryption with a fresh ephemeral k: (g^k, m * recipient^k)
    pub fn encrypt_fresh<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        recipient: &BigUint,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let p = &self.group.p;
        if plaintext >= p {
            return Err(ElGamalError::PlaintextTooLarge);
        }

        let k = rng.gen_biguint_range(&BigUint::one(), &(p - 1u32));
        let a = mod_exp(&self.group.g, &k, p);
        let b = encrypt(plaintext, recipient, &k, p)?;

        Ok(Ciphertext::new(a, b))
    }

    /// Encrypt according to `config.ephemeral_mode`
    pub fn encrypt_with_mode<R: RngCore + CryptoRng>(
        &self,
        plaintext: &BigUint,
        recipient: &BigUint,
        sender: &KeyPair,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let ciphertext = match self.config.ephemeral_mode {
            EphemeralMode::Reused => self.encrypt_as_pair(plaintext, recipient, sender)?,
            EphemeralMode::Fresh => self.encrypt_fresh(plaintext, recipient, rng)?,
        };
        trace!(mode = %self.config.ephemeral_mode, bytes = ciphertext.size_bytes(), "encrypted");
        Ok(ciphertext)
    }

    /// Encode `text` and encrypt it for `recipient`
    pub fn encrypt_message<R: RngCore + CryptoRng>(
        &self,
        text: &str,
        recipient: &BigUint,
        sender: &KeyPair,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let m = encode_text_for(text, &self.group.p)?;
        self.encrypt_with_mode(&m, recipient, sender, rng)
    }

    /// Decrypt a ciphertext using the private key
    pub fn decrypt(&self, ciphertext: &Ciphertext, private_key: &PrivateKey) -> Result<BigUint> {
        decrypt(ciphertext, &private_key.x, &self.group.p)
    }

    /// Decrypt and decode as UTF-8.
    ///
    /// A wrong key or a corrupted ciphertext usually shows up here as
    /// `ElGamalError::Decode`.
    pub fn decrypt_message(&self, ciphertext: &Ciphertext, private_key: &PrivateKey) -> Result<String> {
        let m = self.decrypt(ciphertext, private_key)?;
        decode_text(&m)
    }
}
