//! NIST P-256 (secp256r1) group backend.
//!
//! Points are held in projective coordinates and cross the byte boundary in
//! compressed SEC1 form; scalars use the curve's canonical big-endian
//! encoding.

use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::{Field, PrimeField};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar as P256Scalar, U256};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a P-256 scalar (32 bytes).
const P256_SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed P-256 point (1 byte prefix + 32 byte x-coordinate).
const P256_COMPRESSED_BYTES: usize = 33;

/// P-256 (secp256r1) group backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct P256;

/// Scalar in the P-256 group.
///
/// Zeroized when dropped; equality is constant-time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scalar(
    #[serde(
        serialize_with = "serialize_scalar",
        deserialize_with = "deserialize_scalar"
    )]
    P256Scalar,
);

/// Element (point) in the P-256 group.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element(
    #[serde(
        serialize_with = "serialize_element",
        deserialize_with = "deserialize_element"
    )]
    ProjectivePoint,
);

fn serialize_scalar<S>(scalar: &P256Scalar, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_bytes(&scalar.to_bytes())
}

fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<P256Scalar, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
    if bytes.len() != P256_SCALAR_BYTES {
        return Err(serde::de::Error::invalid_length(
            bytes.len(),
            &"32 bytes for P-256 scalar",
        ));
    }

    let mut arr = [0u8; P256_SCALAR_BYTES];
    arr.copy_from_slice(&bytes);

    Option::<P256Scalar>::from(P256Scalar::from_repr(arr.into()))
        .ok_or_else(|| serde::de::Error::custom("Invalid P-256 scalar"))
}

fn serialize_element<S>(
    element: &ProjectivePoint,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = element.to_affine().to_encoded_point(true);
    serializer.serialize_bytes(encoded.as_bytes())
}

fn deserialize_element<'de, D>(deserializer: D) -> std::result::Result<ProjectivePoint, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bytes: Vec<u8> = serde::Deserialize::deserialize(deserializer)?;
    if bytes.len() != P256_COMPRESSED_BYTES {
        return Err(serde::de::Error::invalid_length(
            bytes.len(),
            &"33 bytes for compressed P-256 point",
        ));
    }

    let encoded = EncodedPoint::from_bytes(&bytes)
        .map_err(|_| serde::de::Error::custom("Invalid encoded point"))?;

    let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or_else(|| serde::de::Error::custom("Invalid P-256 point"))?;

    Ok(ProjectivePoint::from(affine))
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        // P256Scalar does not expose mutable internals, so overwrite with zero
        self.0 = P256Scalar::ZERO;
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_affine().eq(&other.0.to_affine())
    }
}

impl Eq for Element {}

impl Scalar {
    /// Creates a new scalar from a p256 Scalar.
    pub fn new(value: P256Scalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner p256 Scalar.
    pub fn inner(&self) -> &P256Scalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a ProjectivePoint.
    pub fn new(value: ProjectivePoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner ProjectivePoint.
    pub fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Group for P256 {
    type Scalar = Scalar;
    type Element = Element;

    const SCALAR_LENGTH: usize = P256_SCALAR_BYTES;

    fn name() -> &'static str {
        "P-256"
    }

    fn generator() -> Self::Element {
        Element(ProjectivePoint::GENERATOR)
    }

    fn identity() -> Self::Element {
        Element(ProjectivePoint::IDENTITY)
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0.to_affine().is_identity().into()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        Scalar(P256Scalar::random(rng))
    }

    fn base_mul(scalar: &Self::Scalar) -> Self::Element {
        Element(ProjectivePoint::GENERATOR * scalar.0)
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

    fn validate_element(element: &Self::Element) -> Result<()> {
        let affine = element.0.to_affine();

        // Identity is always a member
        if bool::from(affine.is_identity()) {
            return Ok(());
        }

        // Non-identity points must survive a recompression round-trip
        let encoded = affine.to_encoded_point(true);
        match Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded)) {
            Some(decoded) if decoded == affine => Ok(()),
            _ => Err(Error::InvalidGroupElement(
                "Element failed recompression validation".to_string(),
            )),
        }
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
        scalar.0.is_zero().into()
    }

    fn scalar_from_u64(value: u64) -> Self::Scalar {
        Scalar(P256Scalar::from(value))
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != P256_SCALAR_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                P256_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; P256_SCALAR_BYTES];
        arr.copy_from_slice(bytes);

        match Option::<P256Scalar>::from(P256Scalar::from_repr(arr.into())) {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidScalar(
                "Bytes do not represent a valid P-256 scalar".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_reduce_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() > P256_SCALAR_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected at most {} bytes, got {}",
                P256_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; P256_SCALAR_BYTES];
        arr[P256_SCALAR_BYTES - bytes.len()..].copy_from_slice(bytes);

        let field_bytes = FieldBytes::from(arr);
        Ok(Scalar(<P256Scalar as Reduce<U256>>::reduce_bytes(
            &field_bytes,
        )))
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != P256_COMPRESSED_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                P256_COMPRESSED_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidGroupElement("Failed to parse encoded point".to_string()))?;

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidGroupElement("Bytes do not represent a valid P-256 point".to_string())
            })?;

        Ok(Element(ProjectivePoint::from(affine)))
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        element.0.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }
}
