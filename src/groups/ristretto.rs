//! Ristretto255 group backend.
//!
//! Elements cross the byte boundary as 32-byte compressed points. The dalek
//! scalar encoding is little-endian, so scalars are flipped to the crate's
//! canonical big-endian order at the trait boundary.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a Ristretto255 scalar or compressed element (32 bytes).
const RISTRETTO_BYTES: usize = 32;

/// Number of bytes used for wide scalar reduction (64 bytes).
const WIDE_REDUCTION_BYTES: usize = 64;

/// Ristretto255 group backend, a prime-order group over Curve25519.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ristretto255;

/// Scalar in the Ristretto255 group.
///
/// Zeroized when dropped.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Scalar(DalekScalar);

/// Element (point) in the Ristretto255 group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Element(RistrettoPoint);

impl Scalar {
    /// Creates a new scalar from a curve25519_dalek Scalar.
    pub fn new(value: DalekScalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner curve25519_dalek Scalar.
    pub fn inner(&self) -> &DalekScalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a RistrettoPoint.
    pub fn new(value: RistrettoPoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner RistrettoPoint.
    pub fn inner(&self) -> &RistrettoPoint {
        &self.0
    }
}

impl Group for Ristretto255 {
    type Scalar = Scalar;
    type Element = Element;

    const SCALAR_LENGTH: usize = RISTRETTO_BYTES;

    fn name() -> &'static str {
        "Ristretto255"
    }

    fn generator() -> Self::Element {
        Element(RISTRETTO_BASEPOINT_TABLE.basepoint())
    }

    fn identity() -> Self::Element {
        Element(RistrettoPoint::identity())
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0 == RistrettoPoint::identity()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        let mut bytes = [0u8; WIDE_REDUCTION_BYTES];
        rng.fill_bytes(&mut bytes);
        Scalar(DalekScalar::from_bytes_mod_order_wide(&bytes))
    }

    fn base_mul(scalar: &Self::Scalar) -> Self::Element {
        Element(RISTRETTO_BASEPOINT_TABLE * &scalar.0)
    }

    fn scalar_mul(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0 * scalar.0)
    }

    fn element_mul(a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn element_inv(element: &Self::Element) -> Self::Element {
        Element(-element.0)
    }

    fn validate_element(_element: &Self::Element) -> Result<()> {
        // Any decodable RistrettoPoint is a member of the prime-order group
        Ok(())
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 - b.0)
    }

    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        scalar.0 == DalekScalar::ZERO
    }

    fn scalar_from_u64(value: u64) -> Self::Scalar {
        Scalar(DalekScalar::from(value))
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr.copy_from_slice(bytes);
        arr.reverse();

        match DalekScalar::from_canonical_bytes(arr).into() {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidScalar(
                "Bytes do not represent a valid scalar".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        let mut bytes = scalar.0.to_bytes();
        bytes.reverse();
        bytes.to_vec()
    }

    fn scalar_reduce_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() > RISTRETTO_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected at most {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr[RISTRETTO_BYTES - bytes.len()..].copy_from_slice(bytes);
        arr.reverse();

        Ok(Scalar(DalekScalar::from_bytes_mod_order(arr)))
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr.copy_from_slice(bytes);

        match CompressedRistretto(arr).decompress() {
            Some(point) => Ok(Element(point)),
            None => Err(Error::InvalidGroupElement(
                "Bytes do not represent a valid Ristretto point".to_string(),
            )),
        }
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        element.0.compress().to_bytes().to_vec()
    }
}
