//! Pedersen commitments over a prime-order group.
//!
//! The receiver samples a trapdoor `a` and publishes the commitment key
//! `h = g^a`; the committer hides a value `v` as `c = g^v * h^r` for a fresh
//! random `r` and later opens the commitment by revealing `(v, r)`.
//! Commitments are perfectly hiding and binding under the discrete-log
//! assumption.
//!
//! Besides standalone use, this scheme is the challenge-commitment layer of
//! the ZKP/ZKPOK Schnorr variants: there the verifier plays the committer
//! (committing to its challenge) and the prover plays the receiver.

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Commits to values under a receiver-supplied commitment key.
///
/// The opening `(v, r)` stays private until [`decommitment`](Self::decommitment)
/// and is zeroized on drop. Typed scalars keep committed values in `[0, q)`
/// by construction; byte-level inputs are range-checked by
/// [`Group::scalar_from_bytes`] before they can reach this type.
pub struct Committer<G: Group> {
    key: Option<G::Element>,
    opening: Option<(G::Scalar, G::Scalar)>,
}

impl<G: Group> Committer<G> {
    /// Creates a committer with no commitment key yet.
    pub fn new() -> Self {
        Self {
            key: None,
            opening: None,
        }
    }

    /// Installs the receiver's commitment key `h`.
    ///
    /// Must be called before [`commit`](Self::commit); the key is validated
    /// and must not be the identity.
    pub fn set_key(&mut self, key: G::Element) -> Result<()> {
        G::validate_element(&key)?;
        if G::is_identity(&key) {
            return Err(Error::InvalidGroupElement(
                "commitment key cannot be the identity".to_string(),
            ));
        }
        self.key = Some(key);
        Ok(())
    }

    /// Commits to `value`, returning `c = g^value * h^r` for a fresh `r`.
    ///
    /// The opening is stored for a later [`decommitment`](Self::decommitment);
    /// committing again replaces it. Fails with a state error when no key has
    /// been installed, in which case nothing is stored.
    pub fn commit<R: CryptoRngCore>(&mut self, value: G::Scalar, rng: &mut R) -> Result<G::Element> {
        let key = self
            .key
            .as_ref()
            .ok_or(Error::InvalidState("commit requires a commitment key"))?;

        let r = G::random_scalar(rng);
        let commitment = G::element_mul(&G::base_mul(&value), &G::scalar_mul(key, &r));
        self.opening = Some((value, r));

        Ok(commitment)
    }

    /// Reveals the stored opening `(value, r)`.
    pub fn decommitment(&self) -> Result<(G::Scalar, G::Scalar)> {
        self.opening
            .clone()
            .ok_or(Error::InvalidState("nothing has been committed"))
    }

    /// Whether `trapdoor` is the discrete log of the commitment key,
    /// `g^trapdoor = h`.
    ///
    /// A ZKPOK verifier runs this against the trapdoor the prover reveals;
    /// knowing it is what makes the proof extractable. Returns `false` when
    /// no key has been installed.
    pub fn verify_trapdoor(&self, trapdoor: &G::Scalar) -> bool {
        match &self.key {
            Some(key) => G::base_mul(trapdoor) == *key,
            None => false,
        }
    }
}

impl<G: Group> Default for Committer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Group> Drop for Committer<G> {
    fn drop(&mut self) {
        if let Some((value, r)) = self.opening.as_mut() {
            value.zeroize();
            r.zeroize();
        }
    }
}

/// Holds the trapdoor for one commitment session.
///
/// A receiver is built per session and never reused; retries need a fresh
/// trapdoor.
pub struct Receiver<G: Group> {
    trapdoor: G::Scalar,
    key: G::Element,
    commitment: Option<G::Element>,
}

impl<G: Group> Receiver<G> {
    /// Samples a trapdoor `a` and derives the commitment key `h = g^a`.
    pub fn new<R: CryptoRngCore>(rng: &mut R) -> Self {
        let trapdoor = G::random_scalar(rng);
        let key = G::base_mul(&trapdoor);
        Self {
            trapdoor,
            key,
            commitment: None,
        }
    }

    /// The commitment key `h` sent to the committer.
    pub fn commitment_key(&self) -> &G::Element {
        &self.key
    }

    /// The trapdoor `a` with `h = g^a`.
    ///
    /// Revealed only by ZKPOK provers; leaking it breaks binding.
    pub fn trapdoor(&self) -> &G::Scalar {
        &self.trapdoor
    }

    /// Stores the committer's commitment after validating it.
    pub fn set_commitment(&mut self, commitment: G::Element) -> Result<()> {
        G::validate_element(&commitment)?;
        self.commitment = Some(commitment);
        Ok(())
    }

    /// Whether a commitment has been stored.
    pub fn has_commitment(&self) -> bool {
        self.commitment.is_some()
    }

    /// Checks an opening against the stored commitment.
    ///
    /// Returns `Ok(false)` on mismatch, never an error; calling it before a
    /// commitment was stored is a state error.
    pub fn check_decommitment(&self, value: &G::Scalar, randomness: &G::Scalar) -> Result<bool> {
        let stored = self
            .commitment
            .as_ref()
            .ok_or(Error::InvalidState("no commitment to check against"))?;

        // g^value * h^randomness, compared on both coordinates
        let recomputed = G::element_mul(&G::base_mul(value), &G::scalar_mul(&self.key, randomness));
        Ok(recomputed == *stored)
    }
}

impl<G: Group> Drop for Receiver<G> {
    fn drop(&mut self) {
        self.trapdoor.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type Grp = Ristretto255;

    #[test]
    fn commit_and_open() {
        let mut rng = SecureRng::new();
        let mut receiver = Receiver::<Grp>::new(&mut rng);
        let mut committer = Committer::<Grp>::new();

        committer.set_key(receiver.commitment_key().clone()).unwrap();

        let value = Grp::random_scalar(&mut rng);
        let commitment = committer.commit(value, &mut rng).unwrap();
        receiver.set_commitment(commitment).unwrap();

        let (value, r) = committer.decommitment().unwrap();
        assert!(receiver.check_decommitment(&value, &r).unwrap());
    }

    #[test]
    fn wrong_opening_is_rejected() {
        let mut rng = SecureRng::new();
        let mut receiver = Receiver::<Grp>::new(&mut rng);
        let mut committer = Committer::<Grp>::new();

        committer.set_key(receiver.commitment_key().clone()).unwrap();

        let value = Grp::random_scalar(&mut rng);
        let commitment = committer.commit(value, &mut rng).unwrap();
        receiver.set_commitment(commitment).unwrap();

        let (value, r) = committer.decommitment().unwrap();
        let other = Grp::random_scalar(&mut rng);

        assert!(!receiver.check_decommitment(&other, &r).unwrap());
        assert!(!receiver.check_decommitment(&value, &other).unwrap());
    }

    #[test]
    fn commit_without_key_is_a_state_error() {
        let mut rng = SecureRng::new();
        let mut committer = Committer::<Grp>::new();
        let value = Grp::random_scalar(&mut rng);

        assert!(matches!(
            committer.commit(value, &mut rng),
            Err(crate::Error::InvalidState(_))
        ));
        assert!(committer.decommitment().is_err());
    }

    #[test]
    fn check_without_commitment_is_a_state_error() {
        let mut rng = SecureRng::new();
        let receiver = Receiver::<Grp>::new(&mut rng);
        let value = Grp::random_scalar(&mut rng);
        let r = Grp::random_scalar(&mut rng);

        assert!(receiver.check_decommitment(&value, &r).is_err());
    }

    #[test]
    fn identity_key_is_rejected() {
        let mut committer = Committer::<Grp>::new();
        assert!(committer.set_key(Grp::identity()).is_err());
    }

    #[test]
    fn trapdoor_opens_key() {
        let mut rng = SecureRng::new();
        let receiver = Receiver::<Grp>::new(&mut rng);
        let mut committer = Committer::<Grp>::new();

        committer.set_key(receiver.commitment_key().clone()).unwrap();

        assert!(committer.verify_trapdoor(receiver.trapdoor()));
        assert!(!committer.verify_trapdoor(&Grp::random_scalar(&mut rng)));
    }
}
