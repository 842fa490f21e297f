//! Prover and verifier implementations for the proof protocols.
//!
//! These types hold the algebra and the per-move bookkeeping of one session
//! each; the message-driven wrappers in [`crate::session`] drive them from
//! wire messages. State that must not be reused (nonces, simulated shares)
//! lives in intermediate types that are consumed by the transition that
//! spends it.

/// Proof of knowledge of one of two discrete logarithms.
pub mod partial;
/// Schnorr proof of knowledge of a discrete logarithm.
pub mod schnorr;

mod types;

pub use partial::{PartialProver, PartialProverCommitted, PartialVerifier};
pub use schnorr::{SchnorrProver, SchnorrProverCommitted, SchnorrVerifier};
pub use types::{
    Challenge, PartialProofData, ProofData, ProofTriple, ProtocolType, Statement, Witness,
};
