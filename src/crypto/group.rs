use core::fmt::Debug;

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::Result;

/// A cyclic group of prime order `q` with a fixed generator `g`, written
/// multiplicatively.
///
/// This is the only contract the commitment scheme and the sigma protocols
/// need; provers, verifiers, committers and receivers are all generic over
/// it. Backends live in [`crate::groups`].
///
/// Scalars are integers modulo `q` and cross the byte boundary as canonical
/// big-endian strings of exactly [`SCALAR_LENGTH`](Group::SCALAR_LENGTH)
/// bytes. [`scalar_reduce_bytes`](Group::scalar_reduce_bytes) additionally
/// accepts integers that exceed `q` (the partial proof's XOR-combined
/// challenge shares) and reduces them before they enter the algebra.
pub trait Group: Clone + Debug + Send + Sync + 'static {
    /// Integer modulo the group order `q`.
    type Scalar: Clone
        + Debug
        + Eq
        + PartialEq
        + Zeroize
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync;
    /// Group element.
    type Element: Clone
        + Debug
        + Eq
        + PartialEq
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync;

    /// Canonical byte length of a scalar (the byte length of `q`).
    ///
    /// Also the width challenge shares are padded to before the bitwise XOR
    /// in the partial proof; both parties must agree on it exactly.
    const SCALAR_LENGTH: usize;

    /// Human-readable group name.
    fn name() -> &'static str;

    /// The fixed generator `g`.
    fn generator() -> Self::Element;

    /// The identity element.
    fn identity() -> Self::Element;

    /// Whether `element` is the identity.
    fn is_identity(element: &Self::Element) -> bool;

    /// Samples a scalar uniformly from `[0, q)`.
    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar;

    /// Computes `g^s`.
    fn base_mul(scalar: &Self::Scalar) -> Self::Element;

    /// Computes `element^s`.
    fn scalar_mul(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element;

    /// The group operation.
    fn element_mul(a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// The inverse of `element`.
    fn element_inv(element: &Self::Element) -> Self::Element;

    /// Checks that `element` is a valid group member.
    fn validate_element(element: &Self::Element) -> Result<()>;

    /// Adds two scalars mod `q`.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Subtracts `b` from `a` mod `q`.
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Multiplies two scalars mod `q`.
    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Whether `scalar` is zero.
    fn scalar_is_zero(scalar: &Self::Scalar) -> bool;

    /// Embeds a small integer into the scalar field.
    fn scalar_from_u64(value: u64) -> Self::Scalar;

    /// Decodes a canonical big-endian scalar.
    ///
    /// Rejects inputs that are not exactly `SCALAR_LENGTH` bytes or encode a
    /// value outside `[0, q)`.
    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar>;

    /// Canonical big-endian encoding, exactly `SCALAR_LENGTH` bytes.
    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8>;

    /// Interprets up to `SCALAR_LENGTH` big-endian bytes as an unsigned
    /// integer and reduces it mod `q`.
    ///
    /// Shorter inputs are zero-padded on the left; longer inputs are
    /// rejected.
    fn scalar_reduce_bytes(bytes: &[u8]) -> Result<Self::Scalar>;

    /// Decodes an element from its canonical encoding, validating group
    /// membership.
    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element>;

    /// Canonical encoding of an element.
    fn element_to_bytes(element: &Self::Element) -> Vec<u8>;
}
