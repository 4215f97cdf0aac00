//! Append-only, at-most-once set of spent nullifier hashes.
//!
//! The zero-knowledge proof only shows that a valid unspent-looking
//! commitment exists; it can never show the commitment has not been
//! claimed before. This registry is that guard, and it is the one place
//! in the core that must be linearizable: two racing registrations of
//! the same hash must produce exactly one winner for the lifetime of
//! the pool. There is no removal operation.

use std::collections::HashSet;
use std::sync::Mutex;

use ark_bn254::Fr;
use tracing::warn;

use crate::error::PoolError;

#[derive(Debug, Default)]
pub struct NullifierRegistry {
    spent: Mutex<HashSet<Fr>>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a nullifier hash, failing if it was ever seen before.
    /// Atomic with respect to concurrent attempts on the same hash.
    pub fn try_register(&self, nullifier_hash: Fr) -> Result<(), PoolError> {
        let mut spent = self.spent.lock().expect("nullifier registry poisoned");
        if !spent.insert(nullifier_hash) {
            warn!("rejected duplicate nullifier registration");
            return Err(PoolError::NullifierAlreadySpent);
        }
        Ok(())
    }

    pub fn is_spent(&self, nullifier_hash: &Fr) -> bool {
        self.spent
            .lock()
            .expect("nullifier registry poisoned")
            .contains(nullifier_hash)
    }

    pub fn len(&self) -> usize {
        self.spent.lock().expect("nullifier registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
