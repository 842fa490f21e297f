//! Message-driven session state machines for the Schnorr proof.
//!
//! Each wire move is a distinct state and every transition consumes the
//! previous state, so a replayed, repeated or out-of-order message cannot be
//! fed into a session: it either matches the single expected shape or the
//! session aborts with [`Error::UnexpectedMessage`]. An aborted session is
//! gone; retries start fresh with new randomness.

use rand_core::CryptoRngCore;
use tracing::debug;

use super::Message;
use crate::protocol::{
    ProtocolType, SchnorrProver, SchnorrProverCommitted, SchnorrVerifier, Statement, Witness,
};
use crate::{Error, Group, Result};

/// Prover side of one Schnorr session.
pub struct SchnorrProverSession<G: Group> {
    state: ProverState<G>,
}

enum ProverState<G: Group> {
    AwaitCommitment(SchnorrProver<G>),
    AwaitChallenge(SchnorrProverCommitted<G>),
    AwaitStatus,
    Done(bool),
}

impl<G: Group> SchnorrProverSession<G> {
    /// Starts a session and returns the first message to send: the
    /// commitment key in ZKP/ZKPOK, the proof random data in sigma mode.
    pub fn start<R: CryptoRngCore>(
        protocol: ProtocolType,
        statement: Statement<G>,
        witness: Witness<G>,
        rng: &mut R,
    ) -> Result<(Self, Message<G>)> {
        let prover = SchnorrProver::new(protocol, statement, witness, rng)?;
        debug!(?protocol, group = G::name(), "schnorr prover session started");

        if protocol.commits_to_challenge() {
            let key = prover.commitment_key()?.clone();
            let session = Self {
                state: ProverState::AwaitCommitment(prover),
            };
            Ok((session, Message::EcGroupElement(key)))
        } else {
            let (committed, data) = prover.random_data(rng)?;
            let session = Self {
                state: ProverState::AwaitChallenge(committed),
            };
            Ok((session, Message::SchnorrProofRandomData(data)))
        }
    }

    /// Feeds one peer message, returning the successor session and the reply
    /// to send, if any.
    pub fn handle<R: CryptoRngCore>(
        self,
        message: Message<G>,
        rng: &mut R,
    ) -> Result<(Self, Option<Message<G>>)> {
        match (self.state, message) {
            (ProverState::AwaitCommitment(mut prover), Message::EcGroupElement(commitment)) => {
                prover.set_challenge_commitment(commitment)?;
                let (committed, data) = prover.random_data(rng)?;
                Ok((
                    Self {
                        state: ProverState::AwaitChallenge(committed),
                    },
                    Some(Message::SchnorrProofRandomData(data)),
                ))
            }
            (ProverState::AwaitChallenge(committed), Message::PedersenDecommitment(challenge)) => {
                let proof = committed.finalize(&challenge)?;
                Ok((
                    Self {
                        state: ProverState::AwaitStatus,
                    },
                    Some(Message::SchnorrProofData(proof)),
                ))
            }
            (ProverState::AwaitStatus, Message::Status(success)) => {
                debug!(success, group = G::name(), "schnorr prover session finished");
                Ok((
                    Self {
                        state: ProverState::Done(success),
                    },
                    None,
                ))
            }
            _ => Err(Error::UnexpectedMessage(
                "message does not fit the schnorr prover state",
            )),
        }
    }

    /// The verifier's verdict, once the status message has arrived.
    pub fn outcome(&self) -> Option<bool> {
        match self.state {
            ProverState::Done(success) => Some(success),
            _ => None,
        }
    }
}

/// Verifier side of one Schnorr session.
pub struct SchnorrVerifierSession<G: Group> {
    state: VerifierState<G>,
}

enum VerifierState<G: Group> {
    Init(SchnorrVerifier<G>),
    CommitmentSent(SchnorrVerifier<G>),
    ChallengeSent(SchnorrVerifier<G>),
    Done(bool),
}

impl<G: Group> SchnorrVerifierSession<G> {
    /// Creates a verifier session; the prover speaks first.
    pub fn new(protocol: ProtocolType) -> Self {
        debug!(?protocol, group = G::name(), "schnorr verifier session started");
        Self {
            state: VerifierState::Init(SchnorrVerifier::new(protocol)),
        }
    }

    /// Feeds one peer message, returning the successor session and the reply
    /// to send, if any.
    ///
    /// The final transition verifies the proof and replies with the status;
    /// a ZKPOK trapdoor failure aborts with [`Error::InvalidTrapdoor`]
    /// before any status is produced.
    pub fn handle<R: CryptoRngCore>(
        self,
        message: Message<G>,
        rng: &mut R,
    ) -> Result<(Self, Option<Message<G>>)> {
        match (self.state, message) {
            (VerifierState::Init(mut verifier), Message::EcGroupElement(key))
                if verifier.protocol().commits_to_challenge() =>
            {
                let commitment = verifier.commit_to_challenge(key, rng)?;
                Ok((
                    Self {
                        state: VerifierState::CommitmentSent(verifier),
                    },
                    Some(Message::EcGroupElement(commitment)),
                ))
            }
            (VerifierState::Init(mut verifier), Message::SchnorrProofRandomData(data))
                if !verifier.protocol().commits_to_challenge() =>
            {
                verifier.set_random_data(data)?;
                let challenge = verifier.challenge(rng)?;
                Ok((
                    Self {
                        state: VerifierState::ChallengeSent(verifier),
                    },
                    Some(Message::PedersenDecommitment(challenge)),
                ))
            }
            (
                VerifierState::CommitmentSent(mut verifier),
                Message::SchnorrProofRandomData(data),
            ) => {
                verifier.set_random_data(data)?;
                let challenge = verifier.challenge(rng)?;
                Ok((
                    Self {
                        state: VerifierState::ChallengeSent(verifier),
                    },
                    Some(Message::PedersenDecommitment(challenge)),
                ))
            }
            (VerifierState::ChallengeSent(verifier), Message::SchnorrProofData(proof)) => {
                let success = verifier.verify(&proof)?;
                debug!(success, group = G::name(), "schnorr verifier session finished");
                Ok((
                    Self {
                        state: VerifierState::Done(success),
                    },
                    Some(Message::Status(success)),
                ))
            }
            _ => Err(Error::UnexpectedMessage(
                "message does not fit the schnorr verifier state",
            )),
        }
    }

    /// The verdict, once the proof has been checked.
    pub fn outcome(&self) -> Option<bool> {
        match self.state {
            VerifierState::Done(success) => Some(success),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type Grp = Ristretto255;

    fn session_inputs(rng: &mut SecureRng) -> (Statement<Grp>, Witness<Grp>) {
        let witness = Witness::new(Grp::random_scalar(rng));
        let statement = Statement::from_witness(Grp::generator(), &witness);
        (statement, witness)
    }

    /// Shuttles messages between the two sessions until both are done.
    fn drive(protocol: ProtocolType) -> (Option<bool>, Option<bool>) {
        let mut rng = SecureRng::new();
        let (statement, witness) = session_inputs(&mut rng);

        let (mut prover, mut outbound) =
            SchnorrProverSession::start(protocol, statement, witness, &mut rng).unwrap();
        let mut verifier = SchnorrVerifierSession::<Grp>::new(protocol);

        loop {
            let (next_verifier, reply) = verifier.handle(outbound, &mut rng).unwrap();
            verifier = next_verifier;

            let Some(reply) = reply else { break };
            let (next_prover, response) = prover.handle(reply, &mut rng).unwrap();
            prover = next_prover;

            let Some(response) = response else { break };
            outbound = response;
        }

        (prover.outcome(), verifier.outcome())
    }

    #[test]
    fn full_session_accepts_in_every_mode() {
        for protocol in [ProtocolType::Sigma, ProtocolType::Zkp, ProtocolType::Zkpok] {
            assert_eq!(drive(protocol), (Some(true), Some(true)), "{protocol:?}");
        }
    }

    #[test]
    fn verifier_rejects_out_of_order_message() {
        let mut rng = SecureRng::new();
        let verifier = SchnorrVerifierSession::<Grp>::new(ProtocolType::Sigma);

        let premature = Message::SchnorrProofData(crate::ProofData {
            z: Grp::random_scalar(&mut rng),
            trapdoor: Grp::scalar_from_u64(0),
        });

        assert!(matches!(
            verifier.handle(premature, &mut rng),
            Err(Error::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn sigma_verifier_rejects_commitment_key() {
        let mut rng = SecureRng::new();
        let verifier = SchnorrVerifierSession::<Grp>::new(ProtocolType::Sigma);

        let key = Message::EcGroupElement(Grp::base_mul(&Grp::random_scalar(&mut rng)));
        assert!(matches!(
            verifier.handle(key, &mut rng),
            Err(Error::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn prover_rejects_status_before_challenge() {
        let mut rng = SecureRng::new();
        let (statement, witness) = session_inputs(&mut rng);

        let (prover, _first) =
            SchnorrProverSession::start(ProtocolType::Sigma, statement, witness, &mut rng)
                .unwrap();

        assert!(matches!(
            prover.handle(Message::Status(true), &mut rng),
            Err(Error::UnexpectedMessage(_))
        ));
    }
}
