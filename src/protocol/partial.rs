//! Proof of knowledge of one of two discrete logarithms.
//!
//! The prover convinces the verifier it knows `x` with `b1 = a1^x` or `x'`
//! with `b2 = a2^x'`, without revealing which. Only the known claim is
//! proven; the other is simulated by picking its challenge share and
//! response up front and deriving a commitment that makes the verification
//! equation hold for any global challenge:
//!
//! 1. Prover sends both triples `(x_i, a_i, b_i)` in a coin-flipped order.
//! 2. Verifier sends one challenge `e`.
//! 3. Prover splits `e` into two shares with `c1 XOR c2 = e` (the simulated
//!    share was fixed in step 1), answers the real claim with
//!    `z1 = r1 + c1 * x mod q`, and returns shares and responses aligned
//!    with the transmitted order.
//! 4. Verifier recombines the shares and checks `a_i^{z_i} = x_i * b_i^{c_i}`
//!    for both triples.
//!
//! The XOR runs over canonical big-endian encodings padded to the group's
//! scalar width; a share may exceed the group order and is reduced only
//! inside exponentiations.

use rand_core::CryptoRngCore;
use tracing::debug;
use zeroize::Zeroize;

use super::{PartialProofData, ProofTriple, Statement, Witness};
use crate::{Error, Group, Result};

/// Pads both inputs on the left to `width` bytes and XORs them.
///
/// Inputs longer than `width` are rejected.
pub fn xor_shares(a: &[u8], b: &[u8], width: usize) -> Result<Vec<u8>> {
    if a.len() > width || b.len() > width {
        return Err(Error::InvalidScalar(format!(
            "challenge share exceeds {width} bytes"
        )));
    }

    let mut out = vec![0u8; width];
    out[width - a.len()..].copy_from_slice(a);
    for (byte, other) in out[width - b.len()..].iter_mut().zip(b) {
        *byte ^= other;
    }
    Ok(out)
}

/// Prover state before the proof random data is produced.
///
/// `known` is the claim whose discrete log the prover holds; `other` is
/// simulated. The wire position of each is randomized and never disclosed.
pub struct PartialProver<G: Group> {
    known: Statement<G>,
    witness: Witness<G>,
    other: Statement<G>,
}

impl<G: Group> PartialProver<G> {
    /// Creates a prover knowing the discrete log of `known`.
    pub fn new(known: Statement<G>, witness: Witness<G>, other: Statement<G>) -> Result<Self> {
        known.validate()?;
        other.validate()?;
        Ok(Self {
            known,
            witness,
            other,
        })
    }

    /// Produces both proof triples in a coin-flipped order, consuming the
    /// prover.
    ///
    /// The real claim gets a fresh nonce commitment `x1 = a1^{r1}`; the
    /// simulated claim gets a pre-answered commitment
    /// `x2 = a2^{z2} * (b2^{c2})^{-1}` for random `c2`, `z2`.
    pub fn random_data<R: CryptoRngCore>(
        self,
        rng: &mut R,
    ) -> (PartialProverCommitted<G>, ProofTriple<G>, ProofTriple<G>) {
        let nonce = G::random_scalar(rng);
        let simulated_share = G::random_scalar(rng);
        let simulated_response = G::random_scalar(rng);

        let real = ProofTriple {
            x: G::scalar_mul(self.known.a(), &nonce),
            a: self.known.a().clone(),
            b: self.known.b().clone(),
        };

        let simulated_x = G::element_mul(
            &G::scalar_mul(self.other.a(), &simulated_response),
            &G::element_inv(&G::scalar_mul(self.other.b(), &simulated_share)),
        );
        let simulated = ProofTriple {
            x: simulated_x,
            a: self.other.a().clone(),
            b: self.other.b().clone(),
        };

        // the wire order must not reveal which claim is real
        let swapped = rng.next_u32() & 1 == 1;

        let committed = PartialProverCommitted {
            witness: self.witness,
            nonce,
            simulated_share,
            simulated_response,
            swapped,
        };

        if swapped {
            (committed, simulated, real)
        } else {
            (committed, real, simulated)
        }
    }
}

/// Prover state holding the nonce and the simulated branch, awaiting the
/// challenge.
pub struct PartialProverCommitted<G: Group> {
    witness: Witness<G>,
    nonce: G::Scalar,
    simulated_share: G::Scalar,
    simulated_response: G::Scalar,
    swapped: bool,
}

impl<G: Group> PartialProverCommitted<G> {
    /// Splits the challenge and produces the aligned proof data, consuming
    /// the nonce.
    pub fn finalize(self, e: &G::Scalar) -> Result<PartialProofData<G>> {
        let width = G::SCALAR_LENGTH;
        let simulated_bytes = G::scalar_to_bytes(&self.simulated_share);

        // c1 = c2 XOR e; may exceed q, reduced only for the exponent
        let real_bytes = xor_shares(&G::scalar_to_bytes(e), &simulated_bytes, width)?;
        let real_share = G::scalar_reduce_bytes(&real_bytes)?;

        let z = G::scalar_add(
            &self.nonce,
            &G::scalar_mul_scalar(&real_share, self.witness.secret()),
        );

        let mut nonce = self.nonce;
        nonce.zeroize();

        Ok(if self.swapped {
            PartialProofData {
                c_first: simulated_bytes,
                z_first: self.simulated_response,
                c_second: real_bytes,
                z_second: z,
            }
        } else {
            PartialProofData {
                c_first: real_bytes,
                z_first: z,
                c_second: simulated_bytes,
                z_second: self.simulated_response,
            }
        })
    }
}

/// Verifier for the partial proof.
///
/// Checks both transmitted triples and never learns which one was real.
pub struct PartialVerifier<G: Group> {
    triples: Option<(ProofTriple<G>, ProofTriple<G>)>,
    challenge: Option<G::Scalar>,
}

impl<G: Group> PartialVerifier<G> {
    /// Creates an empty verifier.
    pub fn new() -> Self {
        Self {
            triples: None,
            challenge: None,
        }
    }

    /// Stores both proof triples after validating their elements.
    pub fn set_random_data(&mut self, first: ProofTriple<G>, second: ProofTriple<G>) -> Result<()> {
        if self.triples.is_some() {
            return Err(Error::InvalidState("proof random data already received"));
        }
        first.validate()?;
        second.validate()?;
        self.triples = Some((first, second));
        Ok(())
    }

    /// Samples and stores the global challenge, once per session.
    pub fn challenge<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<G::Scalar> {
        if self.triples.is_none() {
            return Err(Error::InvalidState(
                "challenge is issued after the proof random data",
            ));
        }
        if self.challenge.is_some() {
            return Err(Error::InvalidState("challenge already issued"));
        }

        let e = G::random_scalar(rng);
        self.challenge = Some(e.clone());
        Ok(e)
    }

    /// Runs the final checks against the prover's shares and responses.
    ///
    /// Accepts iff the shares XOR back to the issued challenge bit-exactly
    /// and both triples satisfy `a^z = x * b^c`. The verdict is data, not an
    /// error; malformed share widths abort instead.
    pub fn verify(&self, proof: &PartialProofData<G>) -> Result<bool> {
        let (first, second) = self
            .triples
            .as_ref()
            .ok_or(Error::InvalidState("no proof random data to verify against"))?;
        let e = self
            .challenge
            .as_ref()
            .ok_or(Error::InvalidState("challenge has not been issued"))?;

        let combined = xor_shares(&proof.c_first, &proof.c_second, G::SCALAR_LENGTH)?;
        if combined != G::scalar_to_bytes(e) {
            debug!(group = G::name(), "challenge shares do not recombine");
            return Ok(false);
        }

        let first_ok = Self::check_triple(first, &proof.c_first, &proof.z_first)?;
        let second_ok = Self::check_triple(second, &proof.c_second, &proof.z_second)?;
        let success = first_ok && second_ok;

        debug!(group = G::name(), success, "partial proof verification");
        Ok(success)
    }

    // a^z = x * b^c with the share reduced into the exponent
    fn check_triple(triple: &ProofTriple<G>, share: &[u8], z: &G::Scalar) -> Result<bool> {
        let c = G::scalar_reduce_bytes(share)?;
        let left = G::scalar_mul(&triple.a, z);
        let right = G::element_mul(&triple.x, &G::scalar_mul(&triple.b, &c));
        Ok(left == right)
    }
}

impl<G: Group> Default for PartialVerifier<G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type Grp = Ristretto255;

    fn claims(rng: &mut SecureRng) -> (Statement<Grp>, Witness<Grp>, Statement<Grp>) {
        let witness = Witness::new(Grp::random_scalar(rng));
        let known = Statement::from_witness(Grp::generator(), &witness);

        // a claim whose discrete log nobody in this test holds on purpose
        let other = Statement::new(Grp::generator(), Grp::base_mul(&Grp::random_scalar(rng)));

        (known, witness, other)
    }

    fn run() -> bool {
        let mut rng = SecureRng::new();
        let (known, witness, other) = claims(&mut rng);

        let prover = PartialProver::new(known, witness, other).unwrap();
        let mut verifier = PartialVerifier::<Grp>::new();

        let (prover, first, second) = prover.random_data(&mut rng);
        verifier.set_random_data(first, second).unwrap();

        let e = verifier.challenge(&mut rng).unwrap();
        let proof = prover.finalize(&e).unwrap();

        verifier.verify(&proof).unwrap()
    }

    #[test]
    fn honest_run_accepts() {
        for _ in 0..4 {
            assert!(run());
        }
    }

    #[test]
    fn xor_shares_pads_on_the_left() {
        let out = xor_shares(&[0x0f], &[0xf0, 0x01], 4).unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0xf0, 0x0e]);
    }

    #[test]
    fn xor_shares_rejects_wide_input() {
        assert!(xor_shares(&[0u8; 5], &[0u8; 4], 4).is_err());
    }

    #[test]
    fn shares_recombine_to_the_challenge() {
        let mut rng = SecureRng::new();
        let (known, witness, other) = claims(&mut rng);

        let prover = PartialProver::new(known, witness, other).unwrap();
        let mut verifier = PartialVerifier::<Grp>::new();

        let (prover, first, second) = prover.random_data(&mut rng);
        verifier.set_random_data(first, second).unwrap();

        let e = verifier.challenge(&mut rng).unwrap();
        let proof = prover.finalize(&e).unwrap();

        let combined =
            xor_shares(&proof.c_first, &proof.c_second, Grp::SCALAR_LENGTH).unwrap();
        assert_eq!(combined, Grp::scalar_to_bytes(&e));
    }

    #[test]
    fn tampered_share_rejects() {
        let mut rng = SecureRng::new();
        let (known, witness, other) = claims(&mut rng);

        let prover = PartialProver::new(known, witness, other).unwrap();
        let mut verifier = PartialVerifier::<Grp>::new();

        let (prover, first, second) = prover.random_data(&mut rng);
        verifier.set_random_data(first, second).unwrap();

        let e = verifier.challenge(&mut rng).unwrap();
        let mut proof = prover.finalize(&e).unwrap();
        proof.c_first[0] ^= 0x01;

        assert!(!verifier.verify(&proof).unwrap());
    }

    #[test]
    fn challenge_before_data_is_a_state_error() {
        let mut rng = SecureRng::new();
        let mut verifier = PartialVerifier::<Grp>::new();
        assert!(verifier.challenge(&mut rng).is_err());
    }
}
