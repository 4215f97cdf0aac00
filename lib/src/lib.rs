//! Shielded-pool protocol core.
//!
//! Deposit under a hidden commitment, withdraw to an arbitrary recipient
//! by proving ownership of *some* recorded commitment without revealing
//! which one, and optionally prove the commitment belongs to a curated
//! association set ("proof of innocence") without revealing which member
//! it is. The pieces here are the commitment/nullifier scheme, the
//! fixed-depth Poseidon Merkle accumulator, the two circuit contracts as
//! typed predicates, the Groth16 wire codec the on-chain verifier
//! decompresses, and the at-most-once nullifier registry.
//!
//! Proof generation itself is external: a prover takes the witnesses
//! assembled here and returns an `ark_groth16::Proof<Bn254>` that
//! [`proof::compress_proof`] turns into the submitted byte form.

pub mod association;
pub mod error;
pub mod field;
pub mod innocence;
pub mod merkle;
pub mod note;
pub mod pool;
pub mod poseidon;
pub mod proof;
pub mod registry;
pub mod vkey;
pub mod withdraw;

pub use association::{AssociationSet, ComplianceProvider, MembershipProof, TrustLevel};
pub use error::PoolError;
pub use merkle::{MerklePath, MerkleTree, RootHistory};
pub use note::DepositNote;
pub use pool::ShieldedPool;
pub use proof::CompressedProof;
pub use registry::NullifierRegistry;
pub use vkey::CompressedVerifyingKey;

/// Tree depth for the fast demo configuration.
pub const DEMO_TREE_DEPTH: usize = 10;

/// Production depth, matching the ledger's native account tree. Prover
/// and on-chain verifier must agree on this or proofs silently target
/// the wrong accumulator.
pub const LEDGER_TREE_DEPTH: usize = 26;
