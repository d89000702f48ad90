//! Threshold tally: three authorities, any two of them decrypt the result
//!
//! The secret exponent is dealt out with a degree-1 polynomial. Each
//! authority only ever publishes a partial decryption of the summed votes.

use hevote::election::{partial_decrypt, tally_parallel};
use hevote::{
    ElGamal, ElGamalConfig, ElGamalError, KeyPair, MembershipProof, ModInteger, Polynomial,
    Result,
};
use rand::rngs::OsRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Authority {
    index: ModInteger,
    keypair: KeyPair,
}

fn deal_authorities(dealer: &KeyPair, count: u64, threshold: usize) -> Result<Vec<Authority>> {
    let pk = &dealer.public_key;
    let unsigned = |value: &ModInteger| {
        value
            .to_biguint()
            .ok_or_else(|| ElGamalError::InvalidArgument("key component must be non-negative".to_string()))
    };
    let polynomial =
        Polynomial::with_constant_term(dealer.private_key.x(), threshold - 1, pk.q(), &mut OsRng)?;

    (1..=count)
        .map(|i| {
            let index = ModInteger::from(i);
            let share = unsigned(&polynomial.evaluate(&index))?;
            let keypair = KeyPair::from_components(unsigned(pk.p())?, unsigned(pk.g())?, share)?;
            Ok(Authority { index, keypair })
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ElGamalConfig::default();
    let dealer = KeyPair::generate(512, &config, &mut OsRng)?;
    let pk = &dealer.public_key;
    info!(bits = dealer.bit_size(), "election key generated");

    let authorities = deal_authorities(&dealer, 3, 2)?;
    info!(authorities = authorities.len(), threshold = 2, "key shares dealt");

    // Voters
    let elgamal = ElGamal::with_config(pk.clone(), config.clone());
    let domain = config.ballot_domain();
    let choices = [1u64, 0, 1, 1, 0, 1, 1];
    let mut votes = Vec::with_capacity(choices.len());
    for &choice in &choices {
        let vote = ModInteger::from(choice);
        let ct = elgamal.encrypt(&vote, &mut OsRng)?;
        let proof = MembershipProof::commit(pk, &vote, &ct, &domain, &mut OsRng)?;
        if proof.verify(pk, &ct, &domain) {
            votes.push(ct.without_randomness());
        }
    }
    let summed = tally_parallel(pk, &votes);
    info!(votes = votes.len(), "votes summed");

    // Any two authorities recover the same total
    for pair in [[0usize, 1], [1, 2], [0, 2]] {
        let points: Vec<ModInteger> = pair.iter().map(|&i| authorities[i].index.clone()).collect();
        let coefficients = Polynomial::lagrange_coefficients(&points, pk.q())?;
        let shares = pair
            .iter()
            .map(|&i| partial_decrypt(&authorities[i].keypair.private_key, &summed))
            .collect::<Result<Vec<_>>>()?;

        let total = hevote::election::final_sum(&shares, &coefficients, &summed, pk, votes.len() as u64)?;
        println!(
            "Authorities {} and {} decrypt: {} yes out of {}",
            points[0],
            points[1],
            total,
            votes.len()
        );
    }

    let expected: u64 = choices.iter().sum();
    println!("Expected: {}", expected);
    Ok(())
}
