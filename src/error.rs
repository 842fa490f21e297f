/// Errors surfaced by the proof engine.
///
/// Verification verdicts are never errors: a failed algebraic check comes
/// back as `Ok(false)` from `verify` and as `Status { success: false }` on
/// the wire. Everything below aborts the session locally instead; callers
/// must not forward the reason to the peer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Scalar bytes were malformed or encode a value outside `[0, q)`.
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    /// Element bytes were malformed or the point is not a group member.
    #[error("invalid group element: {0}")]
    InvalidGroupElement(String),

    /// An operation was invoked in a protocol state that does not allow it.
    #[error("invalid protocol state: {0}")]
    InvalidState(&'static str),

    /// The peer sent a message that does not fit the current protocol state.
    #[error("unexpected message: {0}")]
    UnexpectedMessage(&'static str),

    /// A wire frame could not be decoded.
    #[error("malformed message: {0}")]
    InvalidMessage(String),

    /// The trapdoor revealed by a ZKPOK prover does not open the commitment key.
    #[error("trapdoor does not open the commitment key")]
    InvalidTrapdoor,
}
