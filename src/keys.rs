//! Key generation and management

use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::{CryptoRng, RngCore};
use std::fmt;
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ElGamalError, Result};
use crate::group::Group;
use crate::utils::mod_exp;

/// Which public identity a freshly generated key pair advertises
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyMode {
    /// The party that sets up the group publishes (p, g, y)
    Initial,
    /// Any later party only publishes y; p and g are already known
    Derived,
}

/// What a party publishes about its key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PublicIdentity {
    Initial {
        p: BigUint,
        g: BigUint,
        y: BigUint,
    },
    Derived {
        y: BigUint,
    },
}

impl PublicIdentity {
    /// The public value y = g^x mod p
    pub fn public_value(&self) -> &BigUint {
        match self {
            PublicIdentity::Initial { y, .. } | PublicIdentity::Derived { y } => y,
        }
    }

    pub fn mode(&self) -> KeyMode {
        match self {
            PublicIdentity::Initial { .. } => KeyMode::Initial,
            PublicIdentity::Derived { .. } => KeyMode::Derived,
        }
    }
}

impl fmt::Display for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicIdentity::Initial { p, g, y } => write!(f, "({}, {}, {})", p, g, y),
            PublicIdentity::Derived { y } => write!(f, "{}", y),
        }
    }
}

/// ElGamal private key
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrivateKey {
    pub(crate) x: BigUint, // Secret exponent
}

impl PrivateKey {
    /// Create a new private key
    pub fn new(x: BigUint) -> Self {
        PrivateKey { x }
    }

    /// Get the secret exponent
    pub fn secret_exponent(&self) -> &BigUint {
        &self.x
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(***)")
    }
}

/// ElGamal key pair for one party
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyPair {
    pub public: PublicIdentity,
    pub private: PrivateKey,
}

impl KeyPair {
    /// Generate a key pair: x drawn uniformly from [1, p-2], y = g^x mod p.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mhe::{Group, KeyMode, KeyPair};
    /// use num_bigint::BigUint;
    /// use rand::rngs::OsRng;
    ///
    /// let group = Group::new(BigUint::from(23u32), BigUint::from(5u32)).unwrap();
    /// let alice = KeyPair::generate(&group, KeyMode::Initial, &mut OsRng);
    /// assert!(alice.public_value() < group.modulus());
    /// ```
    #[instrument(level = "debug", skip_all, fields(bits = group.bit_size(), ?mode))]
    pub fn generate<R: RngCore + CryptoRng>(group: &Group, mode: KeyMode, rng: &mut R) -> Self {
        // [1, p-2] is non-empty since Group guarantees p > 2
        let x = rng.gen_biguint_range(&BigUint::one(), &(&group.p - 1u32));
        let keypair = Self::assemble(group, x, mode);
        debug!(y = %keypair.public_value(), "generated key pair");
        keypair
    }

    /// Rebuild a key pair from a known private exponent
    pub fn from_components(group: &Group, x: BigUint, mode: KeyMode) -> Result<Self> {
        if x < BigUint::one() || x > &group.p - 2u32 {
            return Err(ElGamalError::InvalidParameter(
                "Private exponent x must be in range [1, p-2]".to_string(),
            ));
        }

        Ok(Self::assemble(group, x, mode))
    }

    fn assemble(group: &Group, x: BigUint, mode: KeyMode) -> Self {
        let y = mod_exp(&group.g, &x, &group.p);

        let public = match mode {
            KeyMode::Initial => PublicIdentity::Initial {
                p: group.p.clone(),
                g: group.g.clone(),
                y,
            },
            KeyMode::Derived => PublicIdentity::Derived { y },
        };

        KeyPair {
            public,
            private: PrivateKey { x },
        }
    }

    /// The public value y
    pub fn public_value(&self) -> &BigUint {
        self.public.public_value()
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(public = {}, {})", self.public, self.private)
    }
}

/// Generate a key pair for `group`; see [`KeyPair::generate`]
pub fn generate_keypair<R: RngCore + CryptoRng>(group: &Group, mode: KeyMode, rng: &mut R) -> KeyPair {
    KeyPair::generate(group, mode, rng)
}
