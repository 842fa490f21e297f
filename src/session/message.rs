//! Logical wire messages and their canonical encoding.
//!
//! Transports are free to re-encode messages however they like (every
//! payload is also serde-serializable); the codec here is the canonical
//! length-prefixed binary frame: one tag byte followed by the message's
//! fields, each prefixed with a `u32` big-endian length. Decoding is strict:
//! truncated frames, oversized fields, trailing bytes, invalid elements and
//! out-of-range scalars are all rejected.

use serde::{Deserialize, Serialize};

use crate::protocol::{Challenge, PartialProofData, ProofData, ProofTriple};
use crate::{Error, Group, Result};

/// Upper bound on any length-prefixed field in a frame.
const MAX_FIELD_BYTES: usize = 4096;

const TAG_EC_GROUP_ELEMENT: u8 = 1;
const TAG_SCHNORR_PROOF_RANDOM_DATA: u8 = 2;
const TAG_PEDERSEN_DECOMMITMENT: u8 = 3;
const TAG_SCHNORR_PROOF_DATA: u8 = 4;
const TAG_PARTIAL_PROOF_RANDOM_DATA: u8 = 5;
const TAG_PARTIAL_PROOF_DATA: u8 = 6;
const TAG_STATUS: u8 = 7;

/// One logical message exchanged between the two parties of a session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum Message<G: Group> {
    /// A bare group element: a commitment key or a challenge commitment.
    EcGroupElement(G::Element),
    /// Prover move one of the Schnorr proof: `x = a^r` with the claim.
    SchnorrProofRandomData(ProofTriple<G>),
    /// Verifier challenge, with the commitment randomness (zero in sigma
    /// mode, where this envelope is reused for the cleartext challenge).
    PedersenDecommitment(Challenge<G>),
    /// Prover response, with the trapdoor (zero outside ZKPOK).
    SchnorrProofData(ProofData<G>),
    /// Both proof triples of the partial proof, prover-ordered.
    PartialProofRandomData(ProofTriple<G>, ProofTriple<G>),
    /// Challenge shares and responses of the partial proof.
    PartialProofData(PartialProofData<G>),
    /// Final verdict, the only outcome surfaced to the peer.
    Status(bool),
}

impl<G: Group> Message<G> {
    /// Serializes the message into its canonical frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Message::EcGroupElement(element) => {
                out.push(TAG_EC_GROUP_ELEMENT);
                put_field(&mut out, &G::element_to_bytes(element));
            }
            Message::SchnorrProofRandomData(triple) => {
                out.push(TAG_SCHNORR_PROOF_RANDOM_DATA);
                put_triple::<G>(&mut out, triple);
            }
            Message::PedersenDecommitment(challenge) => {
                out.push(TAG_PEDERSEN_DECOMMITMENT);
                put_field(&mut out, &G::scalar_to_bytes(&challenge.e));
                put_field(&mut out, &G::scalar_to_bytes(&challenge.r));
            }
            Message::SchnorrProofData(proof) => {
                out.push(TAG_SCHNORR_PROOF_DATA);
                put_field(&mut out, &G::scalar_to_bytes(&proof.z));
                put_field(&mut out, &G::scalar_to_bytes(&proof.trapdoor));
            }
            Message::PartialProofRandomData(first, second) => {
                out.push(TAG_PARTIAL_PROOF_RANDOM_DATA);
                put_triple::<G>(&mut out, first);
                put_triple::<G>(&mut out, second);
            }
            Message::PartialProofData(proof) => {
                out.push(TAG_PARTIAL_PROOF_DATA);
                put_field(&mut out, &proof.c_first);
                put_field(&mut out, &G::scalar_to_bytes(&proof.z_first));
                put_field(&mut out, &proof.c_second);
                put_field(&mut out, &G::scalar_to_bytes(&proof.z_second));
            }
            Message::Status(success) => {
                out.push(TAG_STATUS);
                out.push(u8::from(*success));
            }
        }
        out
    }

    /// Decodes a canonical frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, body) = bytes
            .split_first()
            .ok_or_else(|| Error::InvalidMessage("empty frame".to_string()))?;

        let mut cursor = Cursor { bytes: body };
        let message = match tag {
            TAG_EC_GROUP_ELEMENT => Message::EcGroupElement(cursor.element::<G>()?),
            TAG_SCHNORR_PROOF_RANDOM_DATA => {
                Message::SchnorrProofRandomData(cursor.triple::<G>()?)
            }
            TAG_PEDERSEN_DECOMMITMENT => Message::PedersenDecommitment(Challenge {
                e: cursor.scalar::<G>()?,
                r: cursor.scalar::<G>()?,
            }),
            TAG_SCHNORR_PROOF_DATA => Message::SchnorrProofData(ProofData {
                z: cursor.scalar::<G>()?,
                trapdoor: cursor.scalar::<G>()?,
            }),
            TAG_PARTIAL_PROOF_RANDOM_DATA => {
                Message::PartialProofRandomData(cursor.triple::<G>()?, cursor.triple::<G>()?)
            }
            TAG_PARTIAL_PROOF_DATA => Message::PartialProofData(PartialProofData {
                c_first: cursor.share::<G>()?,
                z_first: cursor.scalar::<G>()?,
                c_second: cursor.share::<G>()?,
                z_second: cursor.scalar::<G>()?,
            }),
            TAG_STATUS => Message::Status(cursor.status_flag()?),
            other => {
                return Err(Error::InvalidMessage(format!("unknown message tag: {other}")));
            }
        };

        cursor.finish()?;
        Ok(message)
    }
}

fn put_field(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_be_bytes());
    out.extend_from_slice(field);
}

fn put_triple<G: Group>(out: &mut Vec<u8>, triple: &ProofTriple<G>) {
    put_field(out, &G::element_to_bytes(&triple.x));
    put_field(out, &G::element_to_bytes(&triple.a));
    put_field(out, &G::element_to_bytes(&triple.b));
}

struct Cursor<'a> {
    bytes: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn take(&mut self) -> Result<&'a [u8]> {
        if self.bytes.len() < 4 {
            return Err(Error::InvalidMessage(
                "truncated frame: missing field length".to_string(),
            ));
        }

        let (len_bytes, rest) = self.bytes.split_at(4);
        let len = u32::from_be_bytes(
            len_bytes
                .try_into()
                .unwrap_or_else(|_| unreachable!("slice is exactly 4 bytes")),
        ) as usize;

        if len == 0 || len > MAX_FIELD_BYTES {
            return Err(Error::InvalidMessage(format!("invalid field length: {len}")));
        }
        if rest.len() < len {
            return Err(Error::InvalidMessage(
                "truncated frame: incomplete field".to_string(),
            ));
        }

        let (field, rest) = rest.split_at(len);
        self.bytes = rest;
        Ok(field)
    }

    fn element<G: Group>(&mut self) -> Result<G::Element> {
        G::element_from_bytes(self.take()?)
    }

    fn scalar<G: Group>(&mut self) -> Result<G::Scalar> {
        G::scalar_from_bytes(self.take()?)
    }

    fn triple<G: Group>(&mut self) -> Result<ProofTriple<G>> {
        Ok(ProofTriple {
            x: self.element::<G>()?,
            a: self.element::<G>()?,
            b: self.element::<G>()?,
        })
    }

    // challenge shares are raw bytes of exactly the canonical scalar width
    fn share<G: Group>(&mut self) -> Result<Vec<u8>> {
        let field = self.take()?;
        if field.len() != G::SCALAR_LENGTH {
            return Err(Error::InvalidMessage(format!(
                "challenge share must be {} bytes, got {}",
                G::SCALAR_LENGTH,
                field.len()
            )));
        }
        Ok(field.to_vec())
    }

    fn status_flag(&mut self) -> Result<bool> {
        match self.bytes {
            [0] => {
                self.bytes = &[];
                Ok(false)
            }
            [1] => {
                self.bytes = &[];
                Ok(true)
            }
            _ => Err(Error::InvalidMessage("malformed status flag".to_string())),
        }
    }

    fn finish(self) -> Result<()> {
        if !self.bytes.is_empty() {
            return Err(Error::InvalidMessage(format!(
                "frame has {} trailing bytes",
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type Grp = Ristretto255;

    fn sample_triple(rng: &mut SecureRng) -> ProofTriple<Grp> {
        ProofTriple {
            x: Grp::base_mul(&Grp::random_scalar(rng)),
            a: Grp::base_mul(&Grp::random_scalar(rng)),
            b: Grp::base_mul(&Grp::random_scalar(rng)),
        }
    }

    #[test]
    fn round_trip_every_variant() {
        let mut rng = SecureRng::new();
        let share = Grp::scalar_to_bytes(&Grp::random_scalar(&mut rng));

        let messages = vec![
            Message::EcGroupElement(Grp::base_mul(&Grp::random_scalar(&mut rng))),
            Message::SchnorrProofRandomData(sample_triple(&mut rng)),
            Message::PedersenDecommitment(Challenge {
                e: Grp::random_scalar(&mut rng),
                r: Grp::scalar_from_u64(0),
            }),
            Message::SchnorrProofData(ProofData {
                z: Grp::random_scalar(&mut rng),
                trapdoor: Grp::random_scalar(&mut rng),
            }),
            Message::PartialProofRandomData(sample_triple(&mut rng), sample_triple(&mut rng)),
            Message::PartialProofData(PartialProofData {
                c_first: share.clone(),
                z_first: Grp::random_scalar(&mut rng),
                c_second: share,
                z_second: Grp::random_scalar(&mut rng),
            }),
            Message::Status(true),
            Message::Status(false),
        ];

        for message in messages {
            let bytes = message.to_bytes();
            let decoded = Message::<Grp>::from_bytes(&bytes).unwrap();
            assert_eq!(message, decoded);
        }
    }

    #[test]
    fn rejects_empty_frame() {
        assert!(Message::<Grp>::from_bytes(&[]).is_err());
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(Message::<Grp>::from_bytes(&[99]).is_err());
    }

    #[test]
    fn rejects_truncated_frame() {
        let mut rng = SecureRng::new();
        let message = Message::<Grp>::SchnorrProofRandomData(sample_triple(&mut rng));
        let bytes = message.to_bytes();

        assert!(Message::<Grp>::from_bytes(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut rng = SecureRng::new();
        let message = Message::<Grp>::EcGroupElement(Grp::base_mul(&Grp::random_scalar(&mut rng)));

        let mut bytes = message.to_bytes();
        bytes.push(0xff);
        assert!(Message::<Grp>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_oversized_field_length() {
        let mut bytes = vec![TAG_EC_GROUP_ELEMENT];
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(Message::<Grp>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_invalid_element_bytes() {
        let mut bytes = vec![TAG_EC_GROUP_ELEMENT];
        bytes.extend_from_slice(&32u32.to_be_bytes());
        bytes.extend_from_slice(&[0xff; 32]);
        assert!(Message::<Grp>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_malformed_status() {
        assert!(Message::<Grp>::from_bytes(&[TAG_STATUS]).is_err());
        assert!(Message::<Grp>::from_bytes(&[TAG_STATUS, 2]).is_err());
        assert!(Message::<Grp>::from_bytes(&[TAG_STATUS, 1, 0]).is_err());
    }

    #[test]
    fn rejects_wrong_share_width() {
        let mut rng = SecureRng::new();
        let message = Message::<Grp>::PartialProofData(PartialProofData {
            c_first: vec![1, 2, 3],
            z_first: Grp::random_scalar(&mut rng),
            c_second: vec![0; Grp::SCALAR_LENGTH],
            z_second: Grp::random_scalar(&mut rng),
        });

        let bytes = message.to_bytes();
        assert!(Message::<Grp>::from_bytes(&bytes).is_err());
    }
}
