//! Curated association sets for proof of innocence.
//!
//! An association set is an independently accumulated tree over a
//! *subset* of the same commitment universe, not a separate commitment
//! scheme: the identical commitment value must appear as a leaf in both
//! the global deposit tree and the set tree for a dual-membership proof
//! to exist. Which commitments get in is the set authority's call; this
//! module only accumulates and answers membership queries.

use std::collections::HashSet;

use ark_bn254::Fr;
use tracing::debug;

use crate::error::PoolError;
use crate::merkle::{MerklePath, MerkleTree};

/// How much weight a verifier should give this set's curation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustLevel {
    Low,
    Medium,
    High,
}

/// Answer to a membership query: everything a prover needs to build the
/// association half of an innocence witness.
#[derive(Clone, Debug)]
pub struct MembershipProof {
    pub root: Fr,
    pub path: MerklePath,
}

/// A named, independently accumulated subset of the commitment universe.
#[derive(Clone, Debug)]
pub struct AssociationSet<const DEPTH: usize> {
    pub id: u8,
    pub trust_level: TrustLevel,
    pub provider: String,
    tree: MerkleTree<DEPTH>,
}

impl<const DEPTH: usize> AssociationSet<DEPTH> {
    pub fn new(id: u8, trust_level: TrustLevel, provider: impl Into<String>) -> Self {
        Self {
            id,
            trust_level,
            provider: provider.into(),
            tree: MerkleTree::new(),
        }
    }

    /// Admit a commitment into the set. Returns its leaf index.
    pub fn add_member(&mut self, commitment: Fr) -> Result<usize, PoolError> {
        let index = self.tree.append(commitment)?;
        debug!(set = self.id, index, "association set member added");
        Ok(index)
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn len(&self) -> usize {
        self.tree.leaf_count()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.leaf_count() == 0
    }

    /// Membership query: the set root plus an authentication path for
    /// the given commitment. A commitment the authority never admitted
    /// has no path at all, which is what makes innocence proofs for it
    /// computationally infeasible rather than merely invalid.
    pub fn membership_proof(&self, commitment: Fr) -> Result<MembershipProof, PoolError> {
        let index = self
            .tree
            .index_of(commitment)
            .ok_or(PoolError::CommitmentNotFound)?;
        Ok(MembershipProof {
            root: self.tree.root(),
            path: self.tree.prove_inclusion(index)?,
        })
    }
}

/// Abstract compliance capability deciding whether a depositor and
/// commitment belong in a set. Implementors plug in real chain
/// analysis; the decision logic is policy, not protocol.
pub trait ComplianceProvider {
    fn verify(&self, depositor: &[u8; 32], commitment: Fr) -> bool;
}

/// Provider backed by a fixed allowlist of commitments.
#[derive(Clone, Debug, Default)]
pub struct StaticListProvider {
    approved: HashSet<Fr>,
}

impl StaticListProvider {
    pub fn new(approved: impl IntoIterator<Item = Fr>) -> Self {
        Self {
            approved: approved.into_iter().collect(),
        }
    }
}

impl ComplianceProvider for StaticListProvider {
    fn verify(&self, _depositor: &[u8; 32], commitment: Fr) -> bool {
        self.approved.contains(&commitment)
    }
}
