//! Privacy-preserving referendum: yes/no ballots with membership proofs
//!
//! Run with `RUST_LOG=hevote=debug` to see the protocol steps.

use std::collections::HashSet;

use hevote::election::partial_decrypt;
use hevote::encoding::{decode_ciphertext, decode_proof, encode_ciphertext, encode_proof};
use hevote::{Ballot, ElGamal, ElGamalConfig, Election, KeyPair, MembershipProof, ModInteger};
use rand::rngs::OsRng;
use tracing_subscriber::EnvFilter;

/// A ballot as it travels from the voter to the ballot box
struct SubmittedBallot {
    voter_id: String,
    ciphertext: String,
    proof: String,
}

/// Ballot box for a single yes/no question
struct VotingSystem {
    keypair: KeyPair,
    elgamal: ElGamal,
    election: Election,
    voters: HashSet<String>,
}

impl VotingSystem {
    fn new() -> hevote::Result<Self> {
        println!("Initializing voting system...");
        let config = ElGamalConfig::default();
        let keypair = KeyPair::generate(512, &config, &mut OsRng)?;
        println!("✓ Generated {}", keypair);

        Ok(VotingSystem {
            elgamal: ElGamal::with_config(keypair.public_key.clone(), config.clone()),
            election: Election::with_config(keypair.public_key.clone(), config),
            keypair,
            voters: HashSet::new(),
        })
    }

    /// Voter side: encrypt and prove a 0/1 choice
    fn prepare_ballot(&self, voter_id: &str, choice: u64) -> hevote::Result<SubmittedBallot> {
        let vote = ModInteger::from(choice);
        let domain = self.elgamal.config().ballot_domain();
        let ciphertext = self.elgamal.encrypt(&vote, &mut OsRng)?;
        let proof = MembershipProof::commit(
            &self.keypair.public_key,
            &vote,
            &ciphertext,
            &domain,
            &mut OsRng,
        )?;

        Ok(SubmittedBallot {
            voter_id: voter_id.to_string(),
            ciphertext: encode_ciphertext(&ciphertext),
            proof: encode_proof(&proof),
        })
    }

    /// Ballot box side: reject duplicates and ballots whose proof fails
    fn submit(&mut self, submitted: SubmittedBallot) -> Result<(), String> {
        if self.voters.contains(&submitted.voter_id) {
            return Err("Voter has already voted".to_string());
        }

        let ciphertext = decode_ciphertext(&submitted.ciphertext).map_err(|e| e.to_string())?;
        let proof = decode_proof(&submitted.proof).map_err(|e| e.to_string())?;
        self.election
            .cast_ballot(Ballot::new(ciphertext, proof))
            .map_err(|e| e.to_string())?;

        println!("✓ Ballot accepted from {}", submitted.voter_id);
        self.voters.insert(submitted.voter_id);
        Ok(())
    }

    fn tally(&self) -> hevote::Result<u64> {
        let summed = self.election.sum_votes();
        let share = partial_decrypt(&self.keypair.private_key, &summed)?;
        self.election.final_sum(&[share], &[ModInteger::one()])
    }
}

fn main() -> hevote::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Privacy-Preserving Voting System Demo ===\n");
    let mut system = VotingSystem::new()?;

    println!("\n--- Casting Votes ---");
    let votes = [
        ("voter_001", 1),
        ("voter_002", 0),
        ("voter_003", 1),
        ("voter_004", 1),
        ("voter_005", 0),
    ];
    for (voter_id, choice) in votes {
        let ballot = system.prepare_ballot(voter_id, choice)?;
        if let Err(e) = system.submit(ballot) {
            println!("❌ Ballot from {} rejected: {}", voter_id, e);
        }
    }

    println!("\n--- Testing Security ---");
    let duplicate = system.prepare_ballot("voter_001", 1)?;
    match system.submit(duplicate) {
        Ok(_) => println!("❌ Duplicate vote allowed!"),
        Err(e) => println!("✓ Duplicate vote prevented: {}", e),
    }

    // A vote of 2 encrypts fine, but its proof cannot verify
    let stuffed = system.prepare_ballot("voter_006", 2)?;
    match system.submit(stuffed) {
        Ok(_) => println!("❌ Out-of-range vote accepted!"),
        Err(e) => println!("✓ Out-of-range vote rejected: {}", e),
    }

    println!("\n--- Final Tally ---");
    let yes = system.tally()?;
    let total = system.election.votes().len() as u64;
    println!("  Yes: {}", yes);
    println!("  No:  {}", total - yes);

    println!("\n✅ Voting demo completed successfully!");
    Ok(())
}
