//! # Multiplicative-homomorphic ElGamal over Z_p*
//!
//! This library provides ElGamal encryption over a prime field with:
//! - Safe-prime shape checking (p = 2q + 1)
//! - Generator discovery for Z_p* by factor-based order testing
//! - Key pairs for the party that sets up the group and for every later party
//! - Multiplicative homomorphism: ciphertext products decrypt to plaintext products
//!
//! Randomness is always supplied by the caller through `rand::RngCore + CryptoRng`.
//!
//! ## Example
//!
//! ```rust
//! use mhe::{find_generators, ElGamal, Group, HomomorphicOperations, KeyMode, KeyPair};
//! use num_bigint::BigUint;
//! use rand::rngs::OsRng;
//!
//! let p = BigUint::from(2027u32);
//! let g = find_generators(&p).unwrap()[0].clone();
//! let group = Group::new(p, g).unwrap();
//!
//! let alice = KeyPair::generate(&group, KeyMode::Initial, &mut OsRng);
//! let bob = KeyPair::generate(&group, KeyMode::Derived, &mut OsRng);
//! let elgamal = ElGamal::new(group);
//!
//! // Bob encrypts two values for Alice
//! let ct1 = elgamal.encrypt_as_pair(&6u32.into(), alice.public_value(), &bob).unwrap();
//! let ct2 = elgamal.encrypt_as_pair(&7u32.into(), alice.public_value(), &bob).unwrap();
//!
//! // Alice decrypts their product
//! let product = elgamal.homomorphic_operation(&ct1, &ct2).unwrap();
//! assert_eq!(elgamal.decrypt(&product, &alice.private).unwrap(), BigUint::from(42u32));
//! ```

pub mod codec;
pub mod encryption;
pub mod error;
pub mod group;
pub mod homomorphic;
pub mod keys;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use encryption::{decrypt, encrypt, ElGamal};
pub use error::{ElGamalError, Result};
pub use group::{find_generators, find_generators_with_config, is_generator, Group};
pub use homomorphic::HomomorphicOperations;
pub use keys::{generate_keypair, KeyMode, KeyPair, PrivateKey, PublicIdentity};
pub use types::{Ciphertext, DegeneratePolicy, ElGamalConfig, EphemeralMode, FactorStrategy};
pub use utils::is_safe_prime_shape;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
