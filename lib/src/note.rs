//! Commitment scheme and the client-side deposit note.
//!
//! `commitment = Poseidon(nullifier, secret)`, `nullifier_hash =
//! Poseidon(nullifier)`. The note is created at deposit time, owned
//! exclusively by the depositor (loss is unrecoverable), and logically
//! destroyed on its first successful withdrawal via the nullifier
//! registry.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use rand::RngCore;
use regex::Regex;

use crate::error::PoolError;
use crate::field::{bytes32_from_hex, fe_to_be_bytes};
use crate::poseidon::{hash_pair, hash_single};

/// Derive the public commitment from the secret pair.
pub fn commit(nullifier: Fr, secret: Fr) -> Fr {
    hash_pair(nullifier, secret)
}

/// Derive the public nullifier hash.
pub fn nullifier_hash(nullifier: Fr) -> Fr {
    hash_single(nullifier)
}

/// One deposit's secret material plus its derived public values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositNote {
    pub nullifier: Fr,
    pub secret: Fr,
    pub commitment: Fr,
    pub nullifier_hash: Fr,
    pub amount: u64,
    pub timestamp: u64,
}

impl DepositNote {
    pub fn new(nullifier: Fr, secret: Fr, amount: u64, timestamp: u64) -> Self {
        Self {
            nullifier,
            secret,
            commitment: commit(nullifier, secret),
            nullifier_hash: nullifier_hash(nullifier),
            amount,
            timestamp,
        }
    }

    /// Draw a fresh random note. Secrets are 31 uniformly random bytes,
    /// which keeps them strictly below the scalar modulus.
    pub fn random(amount: u64, timestamp: u64) -> Self {
        Self::new(random_field_31(), random_field_31(), amount, timestamp)
    }

    /// Serialize to the string the depositor carries:
    /// `shroud-<amount>-<nullifier_hex>:<secret_hex>`.
    pub fn encode(&self) -> String {
        format!(
            "shroud-{}-{}:{}",
            self.amount,
            hex::encode(fe_to_be_bytes(&self.nullifier)),
            hex::encode(fe_to_be_bytes(&self.secret)),
        )
    }

    /// Parse a note string back into `(nullifier, secret, amount)`.
    /// The deposit timestamp is ledger metadata and is not carried here.
    pub fn decode(note: &str) -> Result<(Fr, Fr, u64), PoolError> {
        let re = Regex::new(
            r"^shroud-(?P<amount>\d+)-(?P<nullifier>[0-9A-Fa-f]{64}):(?P<secret>[0-9A-Fa-f]{64})$",
        )
        .expect("note regex");
        let caps = re
            .captures(note)
            .ok_or_else(|| PoolError::InvalidFieldElement("malformed note string".into()))?;
        let amount: u64 = caps["amount"]
            .parse()
            .map_err(|_| PoolError::InvalidFieldElement("note amount out of range".into()))?;
        let nullifier = crate::field::fe_from_be_bytes(&bytes32_from_hex(&caps["nullifier"])?)?;
        let secret = crate::field::fe_from_be_bytes(&bytes32_from_hex(&caps["secret"])?)?;
        Ok((nullifier, secret, amount))
    }
}

/// Uniformly random field element drawn from 31 bytes.
fn random_field_31() -> Fr {
    let mut buf = [0u8; 31];
    rand::thread_rng().fill_bytes(&mut buf);
    Fr::from_le_bytes_mod_order(&buf)
}
