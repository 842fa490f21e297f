/// NIST P-256 backend.
pub mod p256;
/// Ristretto255 backend.
pub mod ristretto;

pub use self::p256::P256;
pub use self::ristretto::Ristretto255;

use serde::{Deserialize, Serialize};

use crate::Group;

/// Identifies the curve backend a session runs over.
///
/// The engine itself is generic over [`Group`]; transports exchange this tag
/// to agree on an instantiation before the first protocol message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CurveId {
    /// NIST P-256 (secp256r1).
    P256,
    /// Ristretto255 over Curve25519.
    Ristretto255,
}

impl CurveId {
    /// Group name as reported by the backend.
    pub fn name(&self) -> &'static str {
        match self {
            CurveId::P256 => P256::name(),
            CurveId::Ristretto255 => Ristretto255::name(),
        }
    }
}
