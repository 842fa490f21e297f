/// Group capability consumed by the commitment scheme and the proofs.
pub mod group;
/// Randomness sources.
pub mod rng;

pub use group::Group;
pub use rng::SecureRng;
