//! Integration tests for the ElGamal library

use mhe::utils::{divisors, is_probable_prime, mod_exp, prime_factors, DEFAULT_PRIMALITY_ROUNDS};
use mhe::{
    decrypt, encrypt, find_generators, find_generators_with_config, generate_keypair,
    is_safe_prime_shape, Ciphertext, ElGamal, ElGamalConfig, ElGamalError, FactorStrategy, Group,
    HomomorphicOperations, KeyMode, KeyPair, PublicIdentity,
};
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SMALL_PRIMES: [u64; 12] = [5, 7, 11, 13, 23, 47, 59, 83, 107, 227, 467, 1019];

fn big(n: u64) -> BigUint {
    BigUint::from(n)
}

fn totient(n: &BigUint) -> BigUint {
    prime_factors(n, DEFAULT_PRIMALITY_ROUNDS)
        .unwrap()
        .iter()
        .fold(n.clone(), |acc, r| acc / r * (r - 1u32))
}

#[test]
fn test_end_to_end_exchange() {
    let mut rng = StdRng::seed_from_u64(2024);
    let group = Group::generate(16, &mut rng).expect("Failed to generate group");
    let elgamal = ElGamal::new(group.clone());

    let alice = generate_keypair(&group, KeyMode::Initial, &mut rng);
    let bob = generate_keypair(&group, KeyMode::Derived, &mut rng);

    match &alice.public {
        PublicIdentity::Initial { p, g, .. } => {
            assert_eq!(p, group.modulus());
            assert_eq!(g, group.generator());
        }
        other => panic!("Alice should publish the full triple, got {:?}", other),
    }
    assert!(matches!(bob.public, PublicIdentity::Derived { .. }));

    // Bob -> Alice
    let ct = elgamal
        .encrypt_message("A+", alice.public_value(), &bob, &mut rng)
        .unwrap();
    assert_eq!(ct.a(), bob.public_value());
    assert_eq!(elgamal.decrypt_message(&ct, &alice.private).unwrap(), "A+");

    // Alice -> Bob
    let ct2 = elgamal
        .encrypt_message("B+", bob.public_value(), &alice, &mut rng)
        .unwrap();
    assert_eq!(ct2.a(), alice.public_value());
    assert_eq!(elgamal.decrypt_message(&ct2, &bob.private).unwrap(), "B+");
}

#[test]
fn test_chained_product_of_many_ciphertexts() {
    let mut rng = StdRng::seed_from_u64(7);
    let group = Group::generate(64, &mut rng).unwrap();
    let elgamal = ElGamal::new(group.clone());
    let alice = KeyPair::generate(&group, KeyMode::Initial, &mut rng);
    let bob = KeyPair::generate(&group, KeyMode::Derived, &mut rng);

    let values = [2u64, 3, 5, 7, 11, 13];
    let ciphertexts: Vec<Ciphertext> = values
        .iter()
        .map(|v| {
            elgamal
                .encrypt_as_pair(&big(*v), alice.public_value(), &bob)
                .unwrap()
        })
        .collect();

    let product = elgamal.homomorphic_batch_operation(&ciphertexts).unwrap();
    let decrypted = elgamal.decrypt(&product, &alice.private).unwrap();

    assert_eq!(decrypted, big(2 * 3 * 5 * 7 * 11 * 13));
}

#[test]
fn test_wrong_key_fails_to_decode() {
    let mut rng = StdRng::seed_from_u64(99);
    let group = Group::generate(64, &mut rng).unwrap();
    let elgamal = ElGamal::new(group.clone());
    let alice = KeyPair::generate(&group, KeyMode::Initial, &mut rng);
    let bob = KeyPair::generate(&group, KeyMode::Derived, &mut rng);

    let ct = elgamal
        .encrypt_message("hello", alice.public_value(), &bob, &mut rng)
        .unwrap();

    // Bob's own key does not undo the mask Alice's key was used for
    match elgamal.decrypt_message(&ct, &bob.private) {
        Ok(text) => assert_ne!(text, "hello"),
        Err(ElGamalError::Decode(_)) => (),
        Err(e) => panic!("unexpected error: {}", e),
    }
}

#[test]
fn test_error_handling() {
    assert!(matches!(
        find_generators(&big(22)),
        Err(ElGamalError::NotSafePrimeShape(_))
    ));

    assert!(matches!(
        encrypt(&big(23), &big(2), &big(3), &big(23)),
        Err(ElGamalError::PlaintextTooLarge)
    ));

    let group = Group::new(big(23), big(5)).unwrap();
    let elgamal = ElGamal::new(group);
    assert!(matches!(
        elgamal.homomorphic_batch_operation(&[]),
        Err(ElGamalError::EmptyBatch)
    ));
}

#[test]
fn test_generator_count_is_totient() {
    for p in SMALL_PRIMES {
        let p = big(p);
        let generators = find_generators(&p).unwrap();
        assert_eq!(big(generators.len() as u64), totient(&(&p - 1u32)));
    }
}

#[test]
fn test_generators_have_full_order() {
    // Direct check: the powers of each generator hit every residue
    let p = 59u64;
    for g in find_generators(&big(p)).unwrap() {
        let g = g.to_u64().unwrap();
        let mut seen = vec![false; p as usize];
        let mut x = 1u64;
        for _ in 0..p - 1 {
            x = x * g % p;
            seen[x as usize] = true;
        }
        assert!(seen[1..].iter().all(|s| *s), "{} is not a generator", g);
    }
}

#[test]
fn test_custom_large_parameters() {
    // A 513-bit safe prime and one of its generators
    let p: BigUint = "17046272524770046353534686869137152713278091964600615657915056667709973353343474041594766244938992279226019693292565663449942960155400316760678921739587963"
        .parse()
        .unwrap();
    let g: BigUint = "12140268236437719850105665944733363170316629236668158185210769983102621413814683308414223003775908531242315094917088251146305097641382752827914042212846640"
        .parse()
        .unwrap();
    assert!(is_safe_prime_shape(&p));

    let group = Group::new_verified(p.clone(), g).unwrap();
    let mut rng = StdRng::seed_from_u64(512);
    let elgamal = ElGamal::new(group.clone());
    let alice = KeyPair::generate(&group, KeyMode::Initial, &mut rng);
    let bob = KeyPair::generate(&group, KeyMode::Derived, &mut rng);

    let text = "a longer message that still fits below a 512-bit modulus";
    let ct = elgamal
        .encrypt_message(text, alice.public_value(), &bob, &mut rng)
        .unwrap();
    assert_eq!(elgamal.decrypt_message(&ct, &alice.private).unwrap(), text);

    assert!(matches!(
        find_generators(&p),
        Err(ElGamalError::ModulusTooLarge { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn shape_check_matches_parity(n in 1u64..1_000_000) {
        prop_assert_eq!(is_safe_prime_shape(&big(n)), n % 2 == 1);
    }

    #[test]
    fn odd_primes_have_safe_prime_shape(n in 1u64..100_000) {
        let mut q = (n * 2) | 1;
        while !is_probable_prime(&big(q), 20) {
            q += 2;
        }
        prop_assert!(is_safe_prime_shape(&big(q)));
    }

    #[test]
    fn generators_pass_every_nontrivial_divisor(idx in 0usize..SMALL_PRIMES.len()) {
        let p = big(SMALL_PRIMES[idx]);
        let p_minus_1 = &p - 1u32;
        let nontrivial: Vec<BigUint> = divisors(&p_minus_1)
            .into_iter()
            .filter(|d| !d.is_one() && d != &p_minus_1)
            .collect();

        for c in find_generators(&p).unwrap() {
            for f in &nontrivial {
                prop_assert!(!mod_exp(&c, &(&p_minus_1 / f), &p).is_one());
            }
        }
    }

    #[test]
    fn enumerate_strategy_matches_prime_factors(idx in 0usize..SMALL_PRIMES.len()) {
        let p = big(SMALL_PRIMES[idx]);
        let config = ElGamalConfig::default().with_factor_strategy(FactorStrategy::Enumerate);
        prop_assert_eq!(
            find_generators(&p).unwrap(),
            find_generators_with_config(&p, &config).unwrap()
        );
    }

    #[test]
    fn round_trip_below_modulus(m in 0u64..1019, x in 1u64..1018, seed in any::<u64>()) {
        let p = big(1019);
        let group = Group::new(p.clone(), big(2)).unwrap();
        let recipient = KeyPair::from_components(&group, big(x), KeyMode::Initial).unwrap();
        let sender = generate_keypair(&group, KeyMode::Derived, &mut StdRng::seed_from_u64(seed));

        let b = encrypt(&big(m), recipient.public_value(), sender.private.secret_exponent(), &p).unwrap();
        let ct = Ciphertext::new(sender.public_value().clone(), b);
        prop_assert_eq!(decrypt(&ct, &big(x), &p).unwrap(), big(m));
    }

    #[test]
    fn product_decrypts_to_product(m1 in 0u64..2027, m2 in 0u64..2027, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let group = Group::new(big(2027), big(2)).unwrap();
        let elgamal = ElGamal::new(group.clone());
        let alice = KeyPair::generate(&group, KeyMode::Initial, &mut rng);
        let bob = KeyPair::generate(&group, KeyMode::Derived, &mut rng);

        let c1 = elgamal.encrypt_as_pair(&big(m1), alice.public_value(), &bob).unwrap();
        let c2 = elgamal.encrypt_as_pair(&big(m2), alice.public_value(), &bob).unwrap();
        let product = elgamal.homomorphic_operation(&c1, &c2).unwrap();

        prop_assert_eq!(
            elgamal.decrypt(&product, &alice.private).unwrap(),
            big(m1 * m2 % 2027)
        );
    }
}
