//! Message-driven session state machines for the partial proof.
//!
//! The partial proof runs the plain sigma schedule only: proof random data,
//! cleartext challenge (in the decommitment envelope with zero randomness),
//! proof data, status. Transitions consume states exactly as in
//! [`super::schnorr`].

use rand_core::CryptoRngCore;
use tracing::debug;

use super::Message;
use crate::protocol::{
    Challenge, PartialProver, PartialProverCommitted, PartialVerifier, Statement, Witness,
};
use crate::{Error, Group, Result};

/// Prover side of one partial-proof session.
pub struct PartialProverSession<G: Group> {
    state: ProverState<G>,
}

enum ProverState<G: Group> {
    AwaitChallenge(PartialProverCommitted<G>),
    AwaitStatus,
    Done(bool),
}

impl<G: Group> PartialProverSession<G> {
    /// Starts a session and returns the proof random data to send.
    ///
    /// `known` is the claim whose discrete log the prover holds; `other` is
    /// simulated. Their wire order is randomized here and never revealed.
    pub fn start<R: CryptoRngCore>(
        known: Statement<G>,
        witness: Witness<G>,
        other: Statement<G>,
        rng: &mut R,
    ) -> Result<(Self, Message<G>)> {
        let prover = PartialProver::new(known, witness, other)?;
        let (committed, first, second) = prover.random_data(rng);
        debug!(group = G::name(), "partial prover session started");

        let session = Self {
            state: ProverState::AwaitChallenge(committed),
        };
        Ok((session, Message::PartialProofRandomData(first, second)))
    }

    /// Feeds one peer message, returning the successor session and the reply
    /// to send, if any.
    pub fn handle<R: CryptoRngCore>(
        self,
        message: Message<G>,
        _rng: &mut R,
    ) -> Result<(Self, Option<Message<G>>)> {
        match (self.state, message) {
            (
                ProverState::AwaitChallenge(committed),
                Message::PedersenDecommitment(Challenge { e, r: _ }),
            ) => {
                let proof = committed.finalize(&e)?;
                Ok((
                    Self {
                        state: ProverState::AwaitStatus,
                    },
                    Some(Message::PartialProofData(proof)),
                ))
            }
            (ProverState::AwaitStatus, Message::Status(success)) => {
                debug!(success, group = G::name(), "partial prover session finished");
                Ok((
                    Self {
                        state: ProverState::Done(success),
                    },
                    None,
                ))
            }
            _ => Err(Error::UnexpectedMessage(
                "message does not fit the partial prover state",
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

/// Verifier side of one partial-proof session.
pub struct PartialVerifierSession<G: Group> {
    state: VerifierState<G>,
}

enum VerifierState<G: Group> {
    Init(PartialVerifier<G>),
    ChallengeSent(PartialVerifier<G>),
    Done(bool),
}

impl<G: Group> PartialVerifierSession<G> {
    /// Creates a verifier session; the prover speaks first.
    pub fn new() -> Self {
        debug!(group = G::name(), "partial verifier session started");
        Self {
            state: VerifierState::Init(PartialVerifier::new()),
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
            (VerifierState::Init(mut verifier), Message::PartialProofRandomData(first, second)) => {
                verifier.set_random_data(first, second)?;
                let e = verifier.challenge(rng)?;
                Ok((
                    Self {
                        state: VerifierState::ChallengeSent(verifier),
                    },
                    Some(Message::PedersenDecommitment(Challenge {
                        e,
                        r: G::scalar_from_u64(0),
                    })),
                ))
            }
            (VerifierState::ChallengeSent(verifier), Message::PartialProofData(proof)) => {
                let success = verifier.verify(&proof)?;
                debug!(success, group = G::name(), "partial verifier session finished");
                Ok((
                    Self {
                        state: VerifierState::Done(success),
                    },
                    Some(Message::Status(success)),
                ))
            }
            _ => Err(Error::UnexpectedMessage(
                "message does not fit the partial verifier state",
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

impl<G: Group> Default for PartialVerifierSession<G> {
    fn default() -> Self {
        Self::new()
    }
}
