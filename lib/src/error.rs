use thiserror::Error;

/// Failure taxonomy of the protocol core. None of these are transient:
/// a wrong proof does not become right by resubmission, so nothing in
/// this crate retries. Registry contention is the one case the *caller*
/// may retry with a fresh attempt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Input bytes or decimal string do not encode a canonical field
    /// element (value >= modulus, or malformed length).
    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),

    /// A constraint, codec, or binding check failed. Always surfaced,
    /// never downgraded to a warning.
    #[error("proof invalid: {0}")]
    ProofInvalid(String),

    /// The nullifier hash was already registered. Fatal to this one
    /// withdrawal, not to the system.
    #[error("nullifier already spent")]
    NullifierAlreadySpent,

    /// Accumulator or association-set lookup missed.
    #[error("commitment not found")]
    CommitmentNotFound,

    /// A path length disagrees with the configured tree depth. This is
    /// protocol-version skew between prover and verifier, non-retryable.
    #[error("tree depth mismatch: expected {expected}, got {actual}")]
    TreeDepthMismatch { expected: usize, actual: usize },

    /// The accumulator holds its full `2^depth` complement of leaves.
    #[error("merkle tree full: capacity {capacity}")]
    TreeFull { capacity: usize },
}
