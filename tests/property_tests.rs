use proptest::prelude::*;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sigma_proofs::pedersen::{Committer, Receiver};
use sigma_proofs::protocol::partial::xor_shares;
use sigma_proofs::{
    Challenge, Group, Message, PartialProofData, PartialProver, PartialVerifier, ProofData,
    ProofTriple, ProtocolType, Ristretto255, SchnorrProver, SchnorrVerifier, Statement, Witness,
};

type Grp = Ristretto255;

fn sample_triple(rng: &mut ChaCha20Rng) -> ProofTriple<Grp> {
    ProofTriple {
        x: Grp::base_mul(&Grp::random_scalar(rng)),
        a: Grp::base_mul(&Grp::random_scalar(rng)),
        b: Grp::base_mul(&Grp::random_scalar(rng)),
    }
}

fn run_schnorr(protocol: ProtocolType, rng: &mut ChaCha20Rng) -> bool {
    let witness: Witness<Grp> = Witness::new(Grp::random_scalar(rng));
    let statement: Statement<Grp> = Statement::from_witness(Grp::generator(), &witness);

    let mut prover = SchnorrProver::new(protocol, statement, witness, rng).unwrap();
    let mut verifier = SchnorrVerifier::<Grp>::new(protocol);

    if protocol.commits_to_challenge() {
        let key = prover.commitment_key().unwrap().clone();
        let commitment = verifier.commit_to_challenge(key, rng).unwrap();
        prover.set_challenge_commitment(commitment).unwrap();
    }

    let (prover, data) = prover.random_data(rng).unwrap();
    verifier.set_random_data(data).unwrap();

    let challenge = verifier.challenge(rng).unwrap();
    let proof = prover.finalize(&challenge).unwrap();

    verifier.verify(&proof).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn schnorr_completeness_in_every_mode(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        for protocol in [ProtocolType::Sigma, ProtocolType::Zkp, ProtocolType::Zkpok] {
            prop_assert!(run_schnorr(protocol, &mut rng), "{protocol:?}");
        }
    }

    #[test]
    fn partial_completeness_and_xor_law(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let witness = Witness::new(Grp::random_scalar(&mut rng));
        let known = Statement::from_witness(Grp::generator(), &witness);
        let other = Statement::new(
            Grp::generator(),
            Grp::base_mul(&Grp::random_scalar(&mut rng)),
        );

        let prover = PartialProver::new(known, witness, other).unwrap();
        let mut verifier = PartialVerifier::<Grp>::new();

        let (prover, first, second) = prover.random_data(&mut rng);
        verifier.set_random_data(first, second).unwrap();

        let e = verifier.challenge(&mut rng).unwrap();
        let proof = prover.finalize(&e).unwrap();

        let combined = xor_shares(&proof.c_first, &proof.c_second, Grp::SCALAR_LENGTH).unwrap();
        prop_assert_eq!(combined, Grp::scalar_to_bytes(&e));

        prop_assert!(verifier.verify(&proof).unwrap());
    }

    #[test]
    fn verify_is_idempotent(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let witness = Witness::new(Grp::random_scalar(&mut rng));
        let statement = Statement::from_witness(Grp::generator(), &witness);

        let prover =
            SchnorrProver::new(ProtocolType::Sigma, statement, witness, &mut rng).unwrap();
        let mut verifier = SchnorrVerifier::<Grp>::new(ProtocolType::Sigma);

        let (prover, data) = prover.random_data(&mut rng).unwrap();
        verifier.set_random_data(data).unwrap();
        let challenge = verifier.challenge(&mut rng).unwrap();
        let mut proof = prover.finalize(&challenge).unwrap();

        prop_assert_eq!(verifier.verify(&proof).unwrap(), verifier.verify(&proof).unwrap());

        // also stable for a tampered (rejecting) proof
        proof.z = Grp::random_scalar(&mut rng);
        prop_assert_eq!(verifier.verify(&proof).unwrap(), verifier.verify(&proof).unwrap());
    }

    #[test]
    fn pedersen_binding_rejects_other_openings(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let mut receiver = Receiver::<Grp>::new(&mut rng);
        let mut committer = Committer::<Grp>::new();
        committer.set_key(receiver.commitment_key().clone()).unwrap();

        let value = Grp::random_scalar(&mut rng);
        let commitment = committer.commit(value, &mut rng).unwrap();
        receiver.set_commitment(commitment).unwrap();

        let (value, r) = committer.decommitment().unwrap();
        prop_assert!(receiver.check_decommitment(&value, &r).unwrap());

        let other_value = Grp::random_scalar(&mut rng);
        let other_r = Grp::random_scalar(&mut rng);
        if other_value != value {
            prop_assert!(!receiver.check_decommitment(&other_value, &r).unwrap());
            prop_assert!(!receiver.check_decommitment(&other_value, &other_r).unwrap());
        }
        if other_r != r {
            prop_assert!(!receiver.check_decommitment(&value, &other_r).unwrap());
        }
    }

    #[test]
    fn message_codec_round_trips(seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        let messages = vec![
            Message::<Grp>::EcGroupElement(Grp::base_mul(&Grp::random_scalar(&mut rng))),
            Message::SchnorrProofRandomData(sample_triple(&mut rng)),
            Message::PedersenDecommitment(Challenge {
                e: Grp::random_scalar(&mut rng),
                r: Grp::random_scalar(&mut rng),
            }),
            Message::SchnorrProofData(ProofData {
                z: Grp::random_scalar(&mut rng),
                trapdoor: Grp::scalar_from_u64(0),
            }),
            Message::PartialProofRandomData(sample_triple(&mut rng), sample_triple(&mut rng)),
            Message::PartialProofData(PartialProofData {
                c_first: Grp::scalar_to_bytes(&Grp::random_scalar(&mut rng)),
                z_first: Grp::random_scalar(&mut rng),
                c_second: Grp::scalar_to_bytes(&Grp::random_scalar(&mut rng)),
                z_second: Grp::random_scalar(&mut rng),
            }),
            Message::Status(seed % 2 == 0),
        ];

        for message in messages {
            let decoded = Message::<Grp>::from_bytes(&message.to_bytes()).unwrap();
            prop_assert_eq!(message, decoded);
        }
    }

    #[test]
    fn xor_shares_is_an_involution(a in proptest::collection::vec(any::<u8>(), 0..32),
                                   b in proptest::collection::vec(any::<u8>(), 0..32)) {
        let combined = xor_shares(&a, &b, 32).unwrap();
        let back = xor_shares(&combined, &b, 32).unwrap();

        let mut padded = vec![0u8; 32];
        padded[32 - a.len()..].copy_from_slice(&a);
        prop_assert_eq!(back, padded);
    }
}
