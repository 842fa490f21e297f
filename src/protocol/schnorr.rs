//! Schnorr proof of knowledge of a discrete logarithm.
//!
//! The prover convinces the verifier it knows `x` such that `b = a^x` for a
//! public pair `(a, b)`:
//!
//! 1. Prover samples a nonce `r` and sends `x = a^r` (with the claim).
//! 2. Verifier sends a challenge `e`.
//! 3. Prover sends `z = r + e * x mod q`; the verifier accepts iff
//!    `a^z = x * b^e`.
//!
//! In [`Zkp`](ProtocolType::Zkp) and [`Zkpok`](ProtocolType::Zkpok) modes
//! the verifier must commit to `e` before move 1: the prover generates a
//! Pedersen commitment key (it plays the receiver, so only it knows the
//! trapdoor), the verifier commits to `e` under that key and opens the
//! commitment in move 2. A ZKPOK prover additionally reveals the trapdoor
//! with its response, which the verifier checks against the key.

use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroize;

use super::{Challenge, ProofData, ProofTriple, ProtocolType, Statement, Witness};
use crate::pedersen;
use crate::{Error, Group, Result};

/// Prover state before the proof random data is produced.
///
/// In ZKP/ZKPOK the prover owns the Pedersen receiver whose key the verifier
/// commits to; [`random_data`](Self::random_data) consumes the prover and
/// moves the session into [`SchnorrProverCommitted`].
pub struct SchnorrProver<G: Group> {
    protocol: ProtocolType,
    statement: Statement<G>,
    witness: Witness<G>,
    receiver: Option<pedersen::Receiver<G>>,
}

impl<G: Group> SchnorrProver<G> {
    /// Creates a prover for the given variant.
    ///
    /// The rng seeds the commitment-key trapdoor in ZKP/ZKPOK; sigma mode
    /// draws nothing here.
    pub fn new<R: CryptoRngCore>(
        protocol: ProtocolType,
        statement: Statement<G>,
        witness: Witness<G>,
        rng: &mut R,
    ) -> Result<Self> {
        statement.validate()?;
        let receiver = protocol
            .commits_to_challenge()
            .then(|| pedersen::Receiver::new(rng));

        Ok(Self {
            protocol,
            statement,
            witness,
            receiver,
        })
    }

    /// The protocol variant this prover runs.
    pub fn protocol(&self) -> ProtocolType {
        self.protocol
    }

    /// The commitment key `h` the verifier must commit to (ZKP/ZKPOK only).
    pub fn commitment_key(&self) -> Result<&G::Element> {
        self.receiver
            .as_ref()
            .map(pedersen::Receiver::commitment_key)
            .ok_or(Error::InvalidState("sigma variant has no commitment key"))
    }

    /// Stores the verifier's challenge commitment (ZKP/ZKPOK only).
    pub fn set_challenge_commitment(&mut self, commitment: G::Element) -> Result<()> {
        let receiver = self.receiver.as_mut().ok_or(Error::InvalidState(
            "sigma variant takes no challenge commitment",
        ))?;
        if receiver.has_commitment() {
            return Err(Error::InvalidState("challenge commitment already received"));
        }
        receiver.set_commitment(commitment)
    }

    /// Samples the nonce and produces the proof random data `x = a^r`,
    /// consuming the prover.
    ///
    /// In ZKP/ZKPOK the verifier's challenge commitment must have arrived
    /// first. The nonce lives only in the returned state and is spent by
    /// [`SchnorrProverCommitted::finalize`]; a retry needs a new session.
    pub fn random_data<R: CryptoRngCore>(
        self,
        rng: &mut R,
    ) -> Result<(SchnorrProverCommitted<G>, ProofTriple<G>)> {
        if let Some(receiver) = &self.receiver {
            if !receiver.has_commitment() {
                return Err(Error::InvalidState(
                    "challenge commitment must arrive before the proof random data",
                ));
            }
        }

        let nonce = G::random_scalar(rng);
        let data = ProofTriple {
            x: G::scalar_mul(self.statement.a(), &nonce),
            a: self.statement.a().clone(),
            b: self.statement.b().clone(),
        };

        let committed = SchnorrProverCommitted {
            protocol: self.protocol,
            witness: self.witness,
            receiver: self.receiver,
            nonce,
        };
        Ok((committed, data))
    }
}

/// Prover state holding the single-use nonce, awaiting the challenge.
pub struct SchnorrProverCommitted<G: Group> {
    protocol: ProtocolType,
    witness: Witness<G>,
    receiver: Option<pedersen::Receiver<G>>,
    nonce: G::Scalar,
}

impl<G: Group> SchnorrProverCommitted<G> {
    /// Checks the challenge and produces the response, consuming the nonce.
    ///
    /// In ZKP/ZKPOK the challenge must open the stored commitment; a
    /// mismatch aborts before any response scalar is computed. A ZKPOK
    /// response carries the commitment-key trapdoor, other modes carry zero.
    pub fn finalize(self, challenge: &Challenge<G>) -> Result<ProofData<G>> {
        if let Some(receiver) = &self.receiver {
            if !receiver.check_decommitment(&challenge.e, &challenge.r)? {
                debug!(group = G::name(), "challenge does not open the commitment");
                return Err(Error::UnexpectedMessage(
                    "challenge does not open the earlier commitment",
                ));
            }
        }

        // z = r + e * x mod q
        let z = G::scalar_add(
            &self.nonce,
            &G::scalar_mul_scalar(&challenge.e, self.witness.secret()),
        );

        let trapdoor = match (&self.protocol, &self.receiver) {
            (ProtocolType::Zkpok, Some(receiver)) => receiver.trapdoor().clone(),
            _ => G::scalar_from_u64(0),
        };

        let mut nonce = self.nonce;
        nonce.zeroize();

        Ok(ProofData { z, trapdoor })
    }
}

/// Verifier for the Schnorr proof.
///
/// Accumulates one session's transcript; [`verify`](Self::verify) is a pure
/// function of the finalized transcript and can be called repeatedly.
pub struct SchnorrVerifier<G: Group> {
    protocol: ProtocolType,
    committer: Option<pedersen::Committer<G>>,
    challenge: Option<G::Scalar>,
    challenge_sent: bool,
    data: Option<ProofTriple<G>>,
}

impl<G: Group> SchnorrVerifier<G> {
    /// Creates a verifier for the given variant.
    pub fn new(protocol: ProtocolType) -> Self {
        Self {
            protocol,
            committer: None,
            challenge: None,
            challenge_sent: false,
            data: None,
        }
    }

    /// The protocol variant this verifier runs.
    pub fn protocol(&self) -> ProtocolType {
        self.protocol
    }

    /// Receives the prover's commitment key and returns a commitment to a
    /// freshly sampled challenge (ZKP/ZKPOK only).
    pub fn commit_to_challenge<R: CryptoRngCore>(
        &mut self,
        key: G::Element,
        rng: &mut R,
    ) -> Result<G::Element> {
        if !self.protocol.commits_to_challenge() {
            return Err(Error::InvalidState(
                "sigma variant does not commit to its challenge",
            ));
        }
        if self.committer.is_some() {
            return Err(Error::InvalidState("challenge already committed"));
        }

        let mut committer = pedersen::Committer::new();
        committer.set_key(key)?;

        let e = G::random_scalar(rng);
        let commitment = committer.commit(e.clone(), rng)?;

        self.challenge = Some(e);
        self.committer = Some(committer);
        Ok(commitment)
    }

    /// Stores the prover's proof random data after validating its elements.
    pub fn set_random_data(&mut self, data: ProofTriple<G>) -> Result<()> {
        if self.data.is_some() {
            return Err(Error::InvalidState("proof random data already received"));
        }
        if self.protocol.commits_to_challenge() && self.committer.is_none() {
            return Err(Error::InvalidState(
                "challenge must be committed before the proof random data",
            ));
        }
        data.validate()?;
        self.data = Some(data);
        Ok(())
    }

    /// Emits the challenge: freshly sampled in sigma mode, the stored
    /// decommitment in ZKP/ZKPOK.
    ///
    /// Issued exactly once per session; the proof random data must have
    /// arrived first.
    pub fn challenge<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<Challenge<G>> {
        if self.data.is_none() {
            return Err(Error::InvalidState(
                "challenge is issued after the proof random data",
            ));
        }
        if self.challenge_sent {
            return Err(Error::InvalidState("challenge already issued"));
        }
        self.challenge_sent = true;

        match &self.committer {
            Some(committer) => {
                let (e, r) = committer.decommitment()?;
                Ok(Challenge { e, r })
            }
            None => {
                let e = G::random_scalar(rng);
                self.challenge = Some(e.clone());
                Ok(Challenge {
                    e,
                    r: G::scalar_from_u64(0),
                })
            }
        }
    }

    /// Runs the final checks against the prover's response.
    ///
    /// In ZKPOK the revealed trapdoor must open the commitment key, else the
    /// session aborts with [`Error::InvalidTrapdoor`]; in every other mode a
    /// non-zero trapdoor is refused outright. The algebraic verdict
    /// `a^z = x * b^e` comes back as data, not as an error.
    pub fn verify(&self, proof: &ProofData<G>) -> Result<bool> {
        let data = self
            .data
            .as_ref()
            .ok_or(Error::InvalidState("no proof random data to verify against"))?;
        let e = self
            .challenge
            .as_ref()
            .ok_or(Error::InvalidState("challenge has not been issued"))?;

        match self.protocol {
            ProtocolType::Zkpok => {
                let committer = self
                    .committer
                    .as_ref()
                    .ok_or(Error::InvalidState("challenge has not been committed"))?;
                if !committer.verify_trapdoor(&proof.trapdoor) {
                    return Err(Error::InvalidTrapdoor);
                }
            }
            _ => {
                if !G::scalar_is_zero(&proof.trapdoor) {
                    return Err(Error::UnexpectedMessage(
                        "trapdoor is not accepted outside proof-of-knowledge mode",
                    ));
                }
            }
        }

        // a^z = x * b^e
        let left = G::scalar_mul(&data.a, &proof.z);
        let right = G::element_mul(&data.x, &G::scalar_mul(&data.b, e));
        let success = left == right;

        debug!(group = G::name(), success, "schnorr verification");
        Ok(success)
    }
}
