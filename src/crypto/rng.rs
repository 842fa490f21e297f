//! Randomness sources for protocol sessions.

use rand_core::{CryptoRng, OsRng, RngCore};

/// Operating-system randomness for production sessions.
///
/// Every sampling operation in the crate takes a caller-supplied
/// [`CryptoRngCore`](rand_core::CryptoRngCore) so tests can inject a seeded
/// generator; this wrapper is the source real deployments pass in.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new OS-backed generator.
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}
