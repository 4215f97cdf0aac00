//! Conversions between raw byte strings and canonical field elements.
//!
//! Both BN254 fields flow through here: `Fr` (commitments, nullifiers,
//! tree nodes, public signals) and `Fq` (curve coordinates inside the
//! proof codec). The wire format is 32-byte big-endian throughout, and
//! every decode is strict: a value at or above the modulus is rejected,
//! never silently reduced.

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::PoolError;

/// Encode a field element as 32 big-endian bytes, left-padded.
pub fn fe_to_be_bytes<F: PrimeField>(value: &F) -> [u8; 32] {
    let bytes = value.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Decode 32 big-endian bytes into a field element, rejecting any value
/// that is not already reduced.
pub fn fe_from_be_bytes<F: PrimeField>(bytes: &[u8; 32]) -> Result<F, PoolError> {
    let value = F::from_be_bytes_mod_order(bytes);
    // A canonical encoding survives the round trip unchanged.
    if fe_to_be_bytes(&value) != *bytes {
        return Err(PoolError::InvalidFieldElement(format!(
            "0x{} is not a canonical encoding",
            hex::encode(bytes)
        )));
    }
    Ok(value)
}

/// Parse a decimal string (the snarkjs / circom interchange form) into a
/// canonical field element.
pub fn fe_from_decimal<F: PrimeField>(s: &str) -> Result<F, PoolError> {
    let value: BigUint = s
        .parse()
        .map_err(|_| PoolError::InvalidFieldElement(format!("not a decimal integer: {s:?}")))?;
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(PoolError::InvalidFieldElement(format!(
            "{s} does not fit in 32 bytes"
        )));
    }
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    fe_from_be_bytes(&buf)
}

/// Render a field element as a decimal string.
pub fn fe_to_decimal<F: PrimeField>(value: &F) -> String {
    BigUint::from_bytes_be(&fe_to_be_bytes(value)).to_string()
}

/// Parse a `0x`-prefixed (or bare) hex string into exactly 32 bytes.
pub fn bytes32_from_hex(s: &str) -> Result<[u8; 32], PoolError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let vec = hex::decode(s)
        .map_err(|e| PoolError::InvalidFieldElement(format!("invalid hex {s:?}: {e}")))?;
    if vec.len() != 32 {
        return Err(PoolError::InvalidFieldElement(format!(
            "hex length != 32: {s:?}"
        )));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&vec);
    Ok(arr)
}

/// Convert 32 bytes to a hex string with `0x` and fixed length.
pub fn to_hex32(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
