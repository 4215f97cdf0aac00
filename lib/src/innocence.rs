//! Proof-of-innocence circuit specification.
//!
//! Same commitment/nullifier derivation as the withdraw circuit, but the
//! one hidden commitment must independently satisfy inclusion against two
//! roots: the global deposit tree and a curated association set. The two
//! paths may differ in index and siblings even though they authenticate
//! the same leaf value. A verifier learns "this depositor's funds are in
//! the curated set" without learning which deposit.
//!
//! If the commitment was never added to the association set, no valid
//! association path exists at all; proving is computationally infeasible
//! rather than merely constraint-violating. Exclusion is enforced by the
//! authority that builds the set tree, not by this circuit.

use ark_bn254::Fr;

use crate::error::PoolError;
use crate::field::fe_to_be_bytes;
use crate::merkle::MerklePath;
use crate::withdraw::check_membership;

/// Number of public input slots the on-chain verifier consumes.
pub const INNOCENCE_PUBLIC_INPUTS: usize = 5;

/// Public signals of the innocence statement.
///
/// `association_set_id` and `timestamp` are bound into the proof so a
/// proof minted for one set or epoch cannot be replayed for another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InnocencePublicInputs {
    pub deposit_root: Fr,
    pub association_root: Fr,
    pub nullifier_hash: Fr,
    pub association_set_id: Fr,
    pub timestamp: Fr,
}

impl InnocencePublicInputs {
    pub fn new(
        deposit_root: Fr,
        association_root: Fr,
        nullifier_hash: Fr,
        association_set_id: u8,
        timestamp: u64,
    ) -> Self {
        Self {
            deposit_root,
            association_root,
            nullifier_hash,
            association_set_id: Fr::from(association_set_id),
            timestamp: Fr::from(timestamp),
        }
    }

    /// Wire form in verifier slot order:
    /// `[depositRoot, associationSetRoot, nullifierHash, associationSetId, timestamp]`.
    pub fn to_bytes(&self) -> [[u8; 32]; INNOCENCE_PUBLIC_INPUTS] {
        [
            fe_to_be_bytes(&self.deposit_root),
            fe_to_be_bytes(&self.association_root),
            fe_to_be_bytes(&self.nullifier_hash),
            fe_to_be_bytes(&self.association_set_id),
            fe_to_be_bytes(&self.timestamp),
        ]
    }
}

/// Private signals: one secret pair, two independent paths.
#[derive(Clone, Debug)]
pub struct InnocenceWitness<const DEPTH: usize> {
    pub nullifier: Fr,
    pub secret: Fr,
    pub deposit_siblings: [Fr; DEPTH],
    pub deposit_bits: [u8; DEPTH],
    pub association_siblings: [Fr; DEPTH],
    pub association_bits: [u8; DEPTH],
}

impl<const DEPTH: usize> InnocenceWitness<DEPTH> {
    pub fn from_paths(
        nullifier: Fr,
        secret: Fr,
        deposit_path: &MerklePath,
        association_path: &MerklePath,
    ) -> Result<Self, PoolError> {
        for path in [deposit_path, association_path] {
            if path.depth() != DEPTH || path.bits.len() != DEPTH {
                return Err(PoolError::TreeDepthMismatch {
                    expected: DEPTH,
                    actual: path.depth(),
                });
            }
        }
        let mut witness = Self {
            nullifier,
            secret,
            deposit_siblings: [Fr::default(); DEPTH],
            deposit_bits: [0u8; DEPTH],
            association_siblings: [Fr::default(); DEPTH],
            association_bits: [0u8; DEPTH],
        };
        witness.deposit_siblings.copy_from_slice(&deposit_path.siblings);
        witness.deposit_bits.copy_from_slice(&deposit_path.bits);
        witness
            .association_siblings
            .copy_from_slice(&association_path.siblings);
        witness.association_bits.copy_from_slice(&association_path.bits);
        Ok(witness)
    }
}

/// Evaluate the innocence constraint contract: one secret pair, one
/// derived commitment, two independent inclusion checks.
pub fn check_innocence<const DEPTH: usize>(
    public: &InnocencePublicInputs,
    witness: &InnocenceWitness<DEPTH>,
) -> Result<(), PoolError> {
    check_membership(
        public.deposit_root,
        public.nullifier_hash,
        witness.nullifier,
        witness.secret,
        &witness.deposit_siblings,
        &witness.deposit_bits,
    )
    .map_err(|_| PoolError::ProofInvalid("commitment not proven under deposit root".into()))?;
    check_membership(
        public.association_root,
        public.nullifier_hash,
        witness.nullifier,
        witness.secret,
        &witness.association_siblings,
        &witness.association_bits,
    )
    .map_err(|_| PoolError::ProofInvalid("commitment not proven under association root".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::MerkleTree;
    use crate::note::DepositNote;

    const DEPTH: usize = 2;

    /// The commitment sits at index 3 of a 4-leaf deposit tree and at
    /// index 1 of a 4-leaf association tree.
    fn setup() -> (InnocencePublicInputs, InnocenceWitness<DEPTH>, Fr) {
        let note = DepositNote::random(500, 0);
        let deposit_leaves = vec![
            Fr::from(101u64),
            Fr::from(102u64),
            Fr::from(103u64),
            note.commitment,
        ];
        let association_leaves = vec![
            Fr::from(101u64),
            note.commitment,
            Fr::from(105u64),
            Fr::from(106u64),
        ];

        let deposit_tree = MerkleTree::<DEPTH>::build(&deposit_leaves).unwrap();
        let association_tree = MerkleTree::<DEPTH>::build(&association_leaves).unwrap();

        let public = InnocencePublicInputs::new(
            deposit_tree.root(),
            association_tree.root(),
            note.nullifier_hash,
            3,
            1_700_000_000,
        );
        let witness = InnocenceWitness::from_paths(
            note.nullifier,
            note.secret,
            &deposit_tree.prove_inclusion(3).unwrap(),
            &association_tree.prove_inclusion(1).unwrap(),
        )
        .unwrap();
        (public, witness, deposit_tree.root())
    }

    #[test]
    fn dual_membership_passes() {
        let (public, witness, _) = setup();
        check_innocence(&public, &witness).unwrap();
    }

    #[test]
    fn swapped_roots_fail() {
        let (public, witness, deposit_root) = setup();
        let swapped = InnocencePublicInputs {
            deposit_root: public.association_root,
            association_root: deposit_root,
            ..public
        };
        assert!(check_innocence(&swapped, &witness).is_err());
    }

    #[test]
    fn unrelated_association_root_fails() {
        let (public, witness, _) = setup();
        let unrelated = MerkleTree::<DEPTH>::build(&[Fr::from(9u64)]).unwrap();
        let bad = InnocencePublicInputs {
            association_root: unrelated.root(),
            ..public
        };
        let err = check_innocence(&bad, &witness).unwrap_err();
        assert!(matches!(err, PoolError::ProofInvalid(_)));
    }

    #[test]
    fn paths_are_independent() {
        // crossing the two paths must not verify even though both
        // authenticate the same commitment value
        let (public, witness, _) = setup();
        let mut crossed = witness.clone();
        std::mem::swap(&mut crossed.deposit_siblings, &mut crossed.association_siblings);
        std::mem::swap(&mut crossed.deposit_bits, &mut crossed.association_bits);
        assert!(check_innocence(&public, &crossed).is_err());
    }

    #[test]
    fn wire_order_binds_set_and_epoch() {
        let (public, _, _) = setup();
        let bytes = public.to_bytes();
        let mut set_id = [0u8; 32];
        set_id[31] = 3;
        assert_eq!(bytes[3], set_id);
        let mut ts = [0u8; 32];
        ts[24..32].copy_from_slice(&1_700_000_000u64.to_be_bytes());
        assert_eq!(bytes[4], ts);
    }
}
