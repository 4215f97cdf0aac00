//! Coordinating pool state: one deposit accumulator, its root window,
//! and the nullifier registry, owned together so there is exactly one
//! writer of the shared tree. Pairing verification of submitted proofs
//! stays with the external ledger program; this type enforces the two
//! ledger-side preconditions it can check natively: the proof targets a
//! root this accumulator actually produced, and the nullifier hash was
//! never registered before.

use ark_bn254::Fr;
use tracing::{debug, info};

use crate::error::PoolError;
use crate::merkle::{MerklePath, MerkleTree, RootHistory};
use crate::registry::NullifierRegistry;
use crate::withdraw::WithdrawPublicInputs;

pub struct ShieldedPool<const DEPTH: usize> {
    deposits: MerkleTree<DEPTH>,
    roots: RootHistory,
    nullifiers: NullifierRegistry,
}

impl<const DEPTH: usize> ShieldedPool<DEPTH> {
    pub fn new() -> Self {
        let deposits = MerkleTree::new();
        let mut roots = RootHistory::default();
        roots.record(deposits.root());
        Self {
            deposits,
            roots,
            nullifiers: NullifierRegistry::new(),
        }
    }

    /// Record a deposit commitment. Returns the leaf index and the new
    /// root, which joins the acceptance window. Mutations must be
    /// serialized by the owner; every insert supersedes the root that
    /// in-flight proofs target.
    pub fn deposit(&mut self, commitment: Fr) -> Result<(usize, Fr), PoolError> {
        let index = self.deposits.append(commitment)?;
        let root = self.deposits.root();
        self.roots.record(root);
        debug!(index, "deposit recorded");
        Ok((index, root))
    }

    /// Authentication path for a previously inserted leaf.
    pub fn withdrawal_path(&self, index: usize) -> Result<MerklePath, PoolError> {
        if index >= self.deposits.leaf_count() {
            return Err(PoolError::CommitmentNotFound);
        }
        self.deposits.prove_inclusion(index)
    }

    pub fn root(&self) -> Fr {
        self.deposits.root()
    }

    pub fn leaf_index(&self, commitment: Fr) -> Option<usize> {
        self.deposits.index_of(commitment)
    }

    /// Ledger-side acceptance of a withdrawal whose pairing check has
    /// already passed externally: the public root must be inside the
    /// window of roots this pool produced, and the nullifier hash must
    /// register for the first time. Exactly one of two racing
    /// withdrawals of the same note can ever succeed.
    pub fn accept_withdrawal(&self, public: &WithdrawPublicInputs) -> Result<(), PoolError> {
        if !self.roots.is_known(&public.root) {
            return Err(PoolError::ProofInvalid(
                "proof targets an unknown accumulator root".into(),
            ));
        }
        self.nullifiers.try_register(public.nullifier_hash)?;
        info!("withdrawal accepted");
        Ok(())
    }

    pub fn nullifiers(&self) -> &NullifierRegistry {
        &self.nullifiers
    }
}

impl<const DEPTH: usize> Default for ShieldedPool<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::DepositNote;
    use crate::withdraw::{check_withdraw, WithdrawWitness};

    const DEPTH: usize = 4;

    fn public_for(note: &DepositNote, root: Fr) -> WithdrawPublicInputs {
        WithdrawPublicInputs {
            root,
            nullifier_hash: note.nullifier_hash,
            recipient: Fr::from(1u64),
            relayer: Fr::from(2u64),
            fee: Fr::from(0u64),
        }
    }

    #[test]
    fn deposit_then_withdraw_once() {
        let mut pool = ShieldedPool::<DEPTH>::new();
        let note = DepositNote::random(1_000, 0);
        let (index, root) = pool.deposit(note.commitment).unwrap();

        let path = pool.withdrawal_path(index).unwrap();
        let witness = WithdrawWitness::<DEPTH>::from_path(note.nullifier, note.secret, &path).unwrap();
        let public = public_for(&note, root);
        check_withdraw(&public, &witness).unwrap();

        pool.accept_withdrawal(&public).unwrap();
        assert_eq!(
            pool.accept_withdrawal(&public).unwrap_err(),
            PoolError::NullifierAlreadySpent
        );
    }

    #[test]
    fn unknown_root_rejected() {
        let mut pool = ShieldedPool::<DEPTH>::new();
        let note = DepositNote::random(1_000, 0);
        pool.deposit(note.commitment).unwrap();
        let public = public_for(&note, Fr::from(999u64));
        assert!(matches!(
            pool.accept_withdrawal(&public),
            Err(PoolError::ProofInvalid(_))
        ));
    }

    #[test]
    fn historical_root_stays_accepted_within_window() {
        let mut pool = ShieldedPool::<DEPTH>::new();
        let note = DepositNote::random(1_000, 0);
        let (_, old_root) = pool.deposit(note.commitment).unwrap();
        // later deposits supersede the root but the old one stays known
        pool.deposit(Fr::from(5u64)).unwrap();
        pool.deposit(Fr::from(6u64)).unwrap();
        let public = public_for(&note, old_root);
        pool.accept_withdrawal(&public).unwrap();
    }

    #[test]
    fn missing_leaf_has_no_path() {
        let pool = ShieldedPool::<DEPTH>::new();
        assert_eq!(
            pool.withdrawal_path(0).unwrap_err(),
            PoolError::CommitmentNotFound
        );
    }
}
