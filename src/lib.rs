//! # Interactive Sigma-Protocol Proofs
//!
//! ## Overview
//!
//! This library implements interactive zero-knowledge proofs built from
//! sigma protocols over elliptic-curve groups of prime order:
//!
//! - **Schnorr discrete log**: the prover demonstrates knowledge of `x`
//!   such that `b = a^x` for a public pair `(a, b)`, in three variants:
//!   plain sigma, ZKP (the verifier commits to its challenge first) and
//!   ZKPOK (the verifier additionally proves it played fair by receiving
//!   the commitment-key trapdoor).
//! - **Partial discrete log**: an OR-composition proving knowledge of one
//!   of two discrete logs without revealing which.
//! - **Pedersen commitments**: the perfectly-hiding commitment scheme used
//!   standalone and as the challenge-commitment layer of ZKP/ZKPOK.
//!
//! Sessions are message-driven state machines: each side consumes typed
//! [`Message`]s and produces replies until a `Status` verdict closes the
//! run. Transports carry the messages however they like; a canonical binary
//! codec is provided.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigma_proofs::{
//!     Group, ProtocolType, Ristretto255, SchnorrProverSession,
//!     SchnorrVerifierSession, SecureRng, Statement, Witness,
//! };
//!
//! let mut rng = SecureRng::new();
//!
//! // Prover: secret x and the public claim b = a^x.
//! let witness: Witness<Ristretto255> = Witness::new(Ristretto255::random_scalar(&mut rng));
//! let statement = Statement::from_witness(Ristretto255::generator(), &witness);
//!
//! let (prover, first) =
//!     SchnorrProverSession::start(ProtocolType::Sigma, statement, witness, &mut rng).unwrap();
//! let verifier = SchnorrVerifierSession::new(ProtocolType::Sigma);
//!
//! // Shuttle messages until the verdict comes back.
//! let (verifier, challenge) = verifier.handle(first, &mut rng).unwrap();
//! let (prover, response) = prover.handle(challenge.unwrap(), &mut rng).unwrap();
//! let (verifier, status) = verifier.handle(response.unwrap(), &mut rng).unwrap();
//! let (prover, _) = prover.handle(status.unwrap(), &mut rng).unwrap();
//!
//! assert_eq!(prover.outcome(), Some(true));
//! assert_eq!(verifier.outcome(), Some(true));
//! ```
//!
//! ## Security Considerations
//!
//! - **Randomness**: pass [`SecureRng`] in production; the RNG is an
//!   explicit collaborator everywhere so tests can inject seeded sources.
//! - **Single-use sessions**: nonces and trapdoors are consumed by the
//!   transitions that spend them. Never resume a cancelled session; start a
//!   fresh one. Reusing a nonce across two challenges reveals the secret.
//! - **Abort hygiene**: local errors carry detail for logs; forward at most
//!   a generic `Status(false)` to an untrusted peer.
//! - **Timing**: scalar and point arithmetic is delegated to the curve
//!   crates, which aim for constant-time behavior, but the protocol layer
//!   itself (byte XOR, branch ordering) has not been hardened against
//!   timing analysis of the ordering coin. Treat it as such.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]

/// Cryptographic primitives and traits.
pub mod crypto;
/// Error types for the library.
pub mod error;
/// Curve backend implementations.
pub mod groups;
/// Pedersen commitment scheme.
pub mod pedersen;
/// Prover and verifier implementations.
pub mod protocol;
/// Typed wire messages and session state machines.
pub mod session;

pub use crypto::{Group, SecureRng};
pub use error::Error;
pub use groups::{CurveId, Ristretto255, P256};
pub use protocol::{
    Challenge, PartialProofData, PartialProver, PartialVerifier, ProofData, ProofTriple,
    ProtocolType, SchnorrProver, SchnorrVerifier, Statement, Witness,
};
pub use session::{
    Message, PartialProverSession, PartialVerifierSession, SchnorrProverSession,
    SchnorrVerifierSession,
};

/// A specialized Result type for proof-engine operations.
pub type Result<T> = core::result::Result<T, Error>;
