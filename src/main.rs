//! Alice/Bob demonstration of multiplicative-homomorphic ElGamal.
//!
//! Both parties run locally. Alice sets up the group and publishes (p, g, y);
//! Bob publishes only a public value. Each encrypts a message for the other,
//! then Bob sends two messages whose ciphertext product Alice decrypts.

use anyhow::{Context, Result};
use clap::Parser;
use mhe::codec::encode_text_for;
use mhe::{
    ElGamal, ElGamalConfig, EphemeralMode, Group, HomomorphicOperations, KeyMode, KeyPair,
};
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGE: &str = "A+";
const DEFAULT_SECOND_MESSAGE: &str = "B+";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prime modulus p. Auto-generated when p or g is missing or not an integer.
    #[arg(short, long)]
    p: Option<String>,
    /// Generator g of Z_p*.
    #[arg(short, long)]
    g: Option<String>,
    /// Bit size of auto-generated moduli.
    #[arg(short, long, default_value_t = 16)]
    bits: u64,
    /// Message Bob sends to Alice (only used with a custom p and g).
    #[arg(short, long)]
    message: Option<String>,
    /// Message Alice sends back to Bob (only used with a custom p and g).
    #[arg(short, long)]
    second_message: Option<String>,
    /// Draw a fresh ephemeral exponent per message instead of reusing key pairs.
    #[arg(long)]
    fresh_ephemeral: bool,
    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_int(value: &Option<String>) -> Option<BigUint> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// Custom text when allowed and non-blank, otherwise the default
fn pick_message(custom: &Option<String>, allowed: bool, default: &str) -> String {
    match custom {
        Some(text) if allowed && !text.trim().is_empty() => text.clone(),
        _ => {
            println!("Using default message: '{}'", default);
            default.to_string()
        }
    }
}

fn setup_group(args: &Args, config: &ElGamalConfig, rng: &mut StdRng) -> Result<(Group, bool)> {
    if let (Some(p), Some(g)) = (parse_int(&args.p), parse_int(&args.g)) {
        let group = match Group::new_verified(p.clone(), g.clone()) {
            Ok(group) => group,
            Err(e) => {
                warn!(error = %e, "could not verify g as a generator, using it as given");
                Group::new(p, g).context("invalid group parameters")?
            }
        };
        return Ok((group, true));
    }

    println!("Insufficient input. Automatically generating values...");
    let group = Group::generate_with_config(args.bits, config, rng)
        .context("failed to generate group parameters")?;
    Ok((group, false))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mhe=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .compact()
        .init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let ephemeral_mode = if args.fresh_ephemeral {
        EphemeralMode::Fresh
    } else {
        EphemeralMode::Reused
    };
    let config = ElGamalConfig::default().with_ephemeral_mode(ephemeral_mode);

    println!("=== ElGamal Multiplicative Homomorphism Demo ===\n");

    let (group, custom) = setup_group(&args, &config, &mut rng)?;
    println!("Prime number p: {}", group.modulus());
    println!("Generator g: {}", group.generator());

    let elgamal = ElGamal::with_config(group.clone(), config);

    // Alice sets up the group and publishes (p, g, y)
    let alice = KeyPair::generate(&group, KeyMode::Initial, &mut rng);
    println!("\nAlice's public key: {}", alice.public);

    // Bob already knows p and g
    let bob = KeyPair::generate(&group, KeyMode::Derived, &mut rng);
    println!("Bob's public key: {}", bob.public);
    info!(mode = %ephemeral_mode, "key pairs ready");

    println!("\n--- Bob -> Alice ---");
    let message = pick_message(&args.message, custom, DEFAULT_MESSAGE);
    let ct = elgamal
        .encrypt_message(&message, alice.public_value(), &bob, &mut rng)
        .context("Bob failed to encrypt")?;
    println!("Ciphertext <a, b> is: {}", ct);
    let decrypted = elgamal
        .decrypt_message(&ct, &alice.private)
        .context("Alice failed to decrypt")?;
    println!("Decrypted message: {}", decrypted);

    println!("\n--- Alice -> Bob ---");
    let second = pick_message(&args.second_message, custom, DEFAULT_SECOND_MESSAGE);
    let ct2 = elgamal
        .encrypt_message(&second, bob.public_value(), &alice, &mut rng)
        .context("Alice failed to encrypt")?;
    println!("2nd ciphertext <a, b> is: {}", ct2);
    let decrypted2 = elgamal
        .decrypt_message(&ct2, &bob.private)
        .context("Bob failed to decrypt")?;
    println!("2nd decrypted message: {}", decrypted2);

    println!("\n--- Homomorphic multiplication ---");
    let p = group.modulus();
    let m1 = encode_text_for(&message, p)?;
    let m2 = encode_text_for(&second, p)?;
    let c1 = elgamal.encrypt_with_mode(&m1, alice.public_value(), &bob, &mut rng)?;
    let c2 = elgamal.encrypt_with_mode(&m2, alice.public_value(), &bob, &mut rng)?;
    let product = elgamal.homomorphic_operation(&c1, &c2)?;
    println!("C1 * C2 = {}", product);

    let decrypted_product = elgamal.decrypt(&product, &alice.private)?;
    let expected = (&m1 * &m2) % p;
    println!("D' = {} (M1 * M2 mod p = {})", decrypted_product, expected);

    if decrypted_product != expected {
        anyhow::bail!("homomorphic product mismatch");
    }

    println!("\nDemo completed successfully!");
    Ok(())
}
