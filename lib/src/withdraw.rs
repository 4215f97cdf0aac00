//! Withdraw circuit specification as a typed predicate.
//!
//! The constraint system a conforming prover/verifier pair must satisfy,
//! expressed over named fields with a pure checker. An external Groth16
//! prover attests the same predicate in zero knowledge; `check_withdraw`
//! is the reference semantics both sides are held to, and what witness
//! builders run before burning prover time.

use ark_bn254::Fr;

use crate::error::PoolError;
use crate::field::fe_to_be_bytes;
use crate::merkle::MerklePath;
use crate::note::{commit, nullifier_hash};

/// Number of public input slots the on-chain verifier consumes.
pub const WITHDRAW_PUBLIC_INPUTS: usize = 5;

/// Public signals of the withdraw statement.
///
/// `recipient`, `relayer` and `fee` carry no constraint logic of their
/// own; they are bound into the proof so a captured proof cannot be
/// replayed with a different payout destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawPublicInputs {
    pub root: Fr,
    pub nullifier_hash: Fr,
    pub recipient: Fr,
    pub relayer: Fr,
    pub fee: Fr,
}

impl WithdrawPublicInputs {
    /// Wire form, in the exact slot order the verifier's key was built
    /// for: `[root, nullifierHash, recipient, relayer, fee]`.
    pub fn to_bytes(&self) -> [[u8; 32]; WITHDRAW_PUBLIC_INPUTS] {
        [
            fe_to_be_bytes(&self.root),
            fe_to_be_bytes(&self.nullifier_hash),
            fe_to_be_bytes(&self.recipient),
            fe_to_be_bytes(&self.relayer),
            fe_to_be_bytes(&self.fee),
        ]
    }
}

/// Private signals: the secret pair and the authentication path.
#[derive(Clone, Debug)]
pub struct WithdrawWitness<const DEPTH: usize> {
    pub nullifier: Fr,
    pub secret: Fr,
    pub siblings: [Fr; DEPTH],
    pub bits: [u8; DEPTH],
}

impl<const DEPTH: usize> WithdrawWitness<DEPTH> {
    /// Assemble a witness from an accumulator path. A path of the wrong
    /// length means prover and verifier disagree on the tree depth.
    pub fn from_path(nullifier: Fr, secret: Fr, path: &MerklePath) -> Result<Self, PoolError> {
        if path.depth() != DEPTH || path.bits.len() != DEPTH {
            return Err(PoolError::TreeDepthMismatch {
                expected: DEPTH,
                actual: path.depth(),
            });
        }
        let mut siblings = [Fr::default(); DEPTH];
        siblings.copy_from_slice(&path.siblings);
        let mut bits = [0u8; DEPTH];
        bits.copy_from_slice(&path.bits);
        Ok(Self {
            nullifier,
            secret,
            siblings,
            bits,
        })
    }
}

/// Evaluate the withdraw constraint contract. There is no partial
/// success: any failed constraint invalidates the whole statement.
pub fn check_withdraw<const DEPTH: usize>(
    public: &WithdrawPublicInputs,
    witness: &WithdrawWitness<DEPTH>,
) -> Result<(), PoolError> {
    check_membership(
        public.root,
        public.nullifier_hash,
        witness.nullifier,
        witness.secret,
        &witness.siblings,
        &witness.bits,
    )
}

/// Shared core of both circuits: the secret pair hashes to the public
/// nullifier hash, and its commitment sits in the tree behind `root`.
pub(crate) fn check_membership(
    root: Fr,
    public_nullifier_hash: Fr,
    nullifier: Fr,
    secret: Fr,
    siblings: &[Fr],
    bits: &[u8],
) -> Result<(), PoolError> {
    if let Some(bad) = bits.iter().find(|b| **b > 1) {
        return Err(PoolError::ProofInvalid(format!(
            "path index {bad} is not a bit"
        )));
    }
    if nullifier_hash(nullifier) != public_nullifier_hash {
        return Err(PoolError::ProofInvalid(
            "nullifier hash does not match public signal".into(),
        ));
    }
    let commitment = commit(nullifier, secret);
    let mut node = commitment;
    for (sibling, bit) in siblings.iter().zip(bits) {
        let (l, r) = if *bit == 0 {
            (node, *sibling)
        } else {
            (*sibling, node)
        };
        node = crate::poseidon::hash_pair(l, r);
    }
    if node != root {
        return Err(PoolError::ProofInvalid(
            "recombined path does not reach the public root".into(),
        ));
    }
    Ok(())
}
