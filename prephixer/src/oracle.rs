use std::cell::Cell;

use crate::errors::*;

/// Interface to an encryption oracle returning `E(k, u || prefix || s)`
/// for a fixed unknown key `k`, fixed unknown leading data `u` (possibly
/// empty) and the fixed secret `s` under attack.
///
/// The oracle must be deterministic for the lifetime of one decrypt call:
/// identical plaintext blocks have to produce identical ciphertext blocks.
/// A remote endpoint that rotates its key mid-session breaks the contract
/// and yields garbage, not a detected error.
pub trait Oracle {
    fn encrypt_with_prefix(&self, prefix: &[u8]) -> Result<Vec<u8>>;

    /// Block size of the underlying cipher, if the oracle knows it.
    /// Returning it saves the probing queries; for unpadded modes (where
    /// the ciphertext length tracks the input length byte for byte) it is
    /// the only way the attack can learn the block size.
    fn block_size(&self) -> Option<usize> {
        None
    }

    /// Candidate bytes ordered by how likely they are to occur in the
    /// secret. The list need not be exhaustive; missing values are
    /// appended. Ordering affects cost, never correctness.
    fn character_set(&self) -> Option<Vec<u8>> {
        None
    }

    /// Purely for diagnostics.
    fn name(&self) -> &str {
        "unnamed oracle"
    }
}

/// One decrypt call's view of an oracle. All components funnel their
/// queries through this wrapper so the total cost can be reported to the
/// caller instead of living in hidden global state.
pub struct Session<'a, T: 'a + Oracle + ?Sized> {
    oracle: &'a T,
    calls: Cell<usize>,
}

impl<'a, T: 'a + Oracle + ?Sized> Session<'a, T> {
    pub fn new(oracle: &'a T) -> Session<'a, T> {
        Session {
            oracle,
            calls: Cell::new(0),
        }
    }

    pub fn encrypt(&self, prefix: &[u8]) -> Result<Vec<u8>> {
        self.calls.set(self.calls.get() + 1);
        self.oracle.encrypt_with_prefix(prefix)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn oracle(&self) -> &'a T {
        self.oracle
    }
}
