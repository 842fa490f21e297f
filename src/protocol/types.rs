use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Group, Result};

/// Protocol variant, fixed before the first message of a session.
///
/// The variant determines the message schedule: `Zkp` and `Zkpok` prepend a
/// half-round in which the verifier commits to its challenge under a
/// prover-supplied Pedersen key before seeing any proof data.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProtocolType {
    /// Plain three-move sigma protocol with a cleartext challenge.
    Sigma,
    /// Zero-knowledge against arbitrary verifiers: the challenge is
    /// committed to before the prover's first algebraic move.
    Zkp,
    /// As [`Zkp`](Self::Zkp), and additionally a proof of knowledge: the
    /// prover reveals the commitment-key trapdoor with its response.
    Zkpok,
}

impl ProtocolType {
    /// Whether the variant runs the challenge-commitment half-round.
    pub fn commits_to_challenge(&self) -> bool {
        matches!(self, ProtocolType::Zkp | ProtocolType::Zkpok)
    }
}

/// Public discrete-log statement: the claim `b = a^x` for some secret `x`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Statement<G: Group> {
    a: G::Element,
    b: G::Element,
}

impl<G: Group> Statement<G> {
    /// Creates a statement from the public pair `(a, b)`.
    pub fn new(a: G::Element, b: G::Element) -> Self {
        Self { a, b }
    }

    /// Computes the statement for a known witness: `b = a^x`.
    pub fn from_witness(a: G::Element, witness: &Witness<G>) -> Self {
        let b = G::scalar_mul(&a, witness.secret());
        Self { a, b }
    }

    /// The base `a`.
    pub fn a(&self) -> &G::Element {
        &self.a
    }

    /// The claimed power `b`.
    pub fn b(&self) -> &G::Element {
        &self.b
    }

    /// Validates both elements and rejects an identity base.
    pub fn validate(&self) -> Result<()> {
        G::validate_element(&self.a)?;
        G::validate_element(&self.b)?;
        if G::is_identity(&self.a) {
            return Err(crate::Error::InvalidGroupElement(
                "statement base cannot be the identity".to_string(),
            ));
        }
        Ok(())
    }
}

/// Secret exponent the prover demonstrates knowledge of.
///
/// Zeroized when dropped. Never reuse a witness's nonce material across
/// sessions; the types below enforce this by consuming themselves.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Witness<G: Group> {
    x: G::Scalar,
}

impl<G: Group> Witness<G> {
    /// Wraps a secret scalar.
    pub fn new(x: G::Scalar) -> Self {
        Self { x }
    }

    /// Returns a reference to the secret scalar.
    pub(crate) fn secret(&self) -> &G::Scalar {
        &self.x
    }
}

/// One proof-random-data triple `(x, a, b)`: the prover's commitment
/// `x = a^r` next to the claim `(a, b)` it refers to.
///
/// The Schnorr proof sends one triple; the partial proof sends two, in an
/// order only the prover knows.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProofTriple<G: Group> {
    /// The prover's commitment `x = a^r`.
    pub x: G::Element,
    /// The base of the claim.
    pub a: G::Element,
    /// The claimed power of the base.
    pub b: G::Element,
}

impl<G: Group> ProofTriple<G> {
    /// Validates all three elements.
    pub fn validate(&self) -> Result<()> {
        G::validate_element(&self.x)?;
        G::validate_element(&self.a)?;
        G::validate_element(&self.b)
    }
}

/// Verifier challenge envelope.
///
/// In ZKP/ZKPOK, `r` is the randomness opening the earlier challenge
/// commitment; in sigma mode it is zero and carries no information.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Challenge<G: Group> {
    /// The challenge scalar `e`.
    pub e: G::Scalar,
    /// Commitment randomness, zero outside ZKP/ZKPOK.
    pub r: G::Scalar,
}

/// Prover response envelope.
///
/// `trapdoor` is zero except in ZKPOK, where it is the discrete log of the
/// prover's commitment key; verifiers refuse a non-zero trapdoor in any
/// other mode.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ProofData<G: Group> {
    /// The response `z = r + e * x mod q`.
    pub z: G::Scalar,
    /// Commitment-key trapdoor, zero outside ZKPOK.
    pub trapdoor: G::Scalar,
}

/// Challenge shares and responses of the partial proof, aligned with the
/// order the proof triples were transmitted in.
///
/// Shares are raw big-endian strings of the canonical scalar width, carried
/// un-reduced so the XOR relation with the verifier's challenge stays
/// bit-exact; a share may encode an integer at or above `q` and is reduced
/// only when it enters an exponent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PartialProofData<G: Group> {
    /// Challenge share for the first transmitted triple.
    pub c_first: Vec<u8>,
    /// Response for the first transmitted triple.
    pub z_first: G::Scalar,
    /// Challenge share for the second transmitted triple.
    pub c_second: Vec<u8>,
    /// Response for the second transmitted triple.
    pub z_second: G::Scalar,
}
