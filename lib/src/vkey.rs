//! Verification-key artifact export.
//!
//! The verifier embeds compressed fixed points: `alpha_G1`, `beta_G2`,
//! `gamma_G2`, `delta_G2`, and one G1 point per public-input slot (plus
//! the constant term). The same compression rule as the proof codec is
//! applied once, ahead of time; a mismatch here fails every proof
//! regardless of its correctness. The artifact carries an explicit
//! format version: a circuit change invalidates compatibility of all
//! previously issued proofs with a newer key, so the bump must be
//! visible on the wire.

use ark_bn254::Bn254;
use ark_groth16::VerifyingKey;

use crate::error::PoolError;
use crate::proof::{compress_g1, compress_g2};

/// Current artifact format version.
pub const VKEY_FORMAT_VERSION: u32 = 1;

/// Compressed verifying-key bundle, ready for embedding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedVerifyingKey {
    pub version: u32,
    pub alpha_g1: [u8; 32],
    pub beta_g2: [u8; 64],
    pub gamma_g2: [u8; 64],
    pub delta_g2: [u8; 64],
    /// One entry per public input, plus the leading constant term.
    pub ic: Vec<[u8; 32]>,
}

/// Apply the proof-codec compression to every fixed point of a key.
pub fn compress_verifying_key(
    vk: &VerifyingKey<Bn254>,
    version: u32,
) -> Result<CompressedVerifyingKey, PoolError> {
    Ok(CompressedVerifyingKey {
        version,
        alpha_g1: compress_g1(&vk.alpha_g1)?,
        beta_g2: compress_g2(&vk.beta_g2)?,
        gamma_g2: compress_g2(&vk.gamma_g2)?,
        delta_g2: compress_g2(&vk.delta_g2)?,
        ic: vk
            .gamma_abc_g1
            .iter()
            .map(compress_g1)
            .collect::<Result<_, _>>()?,
    })
}

// version u32 | alpha 32 | beta 64 | gamma 64 | delta 64 | ic count u32
const HEADER_LEN: usize = 4 + 32 + 3 * 64 + 4;

impl CompressedVerifyingKey {
    /// Public-input slots this key verifies.
    pub fn public_input_count(&self) -> usize {
        self.ic.len() - 1
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + 32 * self.ic.len());
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&self.alpha_g1);
        out.extend_from_slice(&self.beta_g2);
        out.extend_from_slice(&self.gamma_g2);
        out.extend_from_slice(&self.delta_g2);
        out.extend_from_slice(&(self.ic.len() as u32).to_be_bytes());
        for point in &self.ic {
            out.extend_from_slice(point);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PoolError> {
        if bytes.len() < HEADER_LEN {
            return Err(PoolError::ProofInvalid(
                "verification-key artifact truncated".into(),
            ));
        }
        let version = u32::from_be_bytes(bytes[..4].try_into().expect("4 bytes"));
        let mut alpha_g1 = [0u8; 32];
        alpha_g1.copy_from_slice(&bytes[4..36]);
        let mut beta_g2 = [0u8; 64];
        beta_g2.copy_from_slice(&bytes[36..100]);
        let mut gamma_g2 = [0u8; 64];
        gamma_g2.copy_from_slice(&bytes[100..164]);
        let mut delta_g2 = [0u8; 64];
        delta_g2.copy_from_slice(&bytes[164..228]);
        let count = u32::from_be_bytes(bytes[228..232].try_into().expect("4 bytes")) as usize;
        if count == 0 {
            return Err(PoolError::ProofInvalid(
                "verification key needs at least the constant IC term".into(),
            ));
        }
        let body = &bytes[HEADER_LEN..];
        if body.len() != 32 * count {
            return Err(PoolError::ProofInvalid(format!(
                "verification-key artifact body is {} bytes, expected {}",
                body.len(),
                32 * count
            )));
        }
        let ic = body
            .chunks_exact(32)
            .map(|chunk| {
                let mut point = [0u8; 32];
                point.copy_from_slice(chunk);
                point
            })
            .collect();
        Ok(Self {
            version,
            alpha_g1,
            beta_g2,
            gamma_g2,
            delta_g2,
            ic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Fr, G1Affine, G2Affine};
    use ark_ec::{AffineRepr, CurveGroup};

    fn sample_vk(public_inputs: usize) -> VerifyingKey<Bn254> {
        let g1 = |k: u64| (G1Affine::generator() * Fr::from(k)).into_affine();
        let g2 = |k: u64| (G2Affine::generator() * Fr::from(k)).into_affine();
        VerifyingKey {
            alpha_g1: g1(2),
            beta_g2: g2(3),
            gamma_g2: g2(5),
            delta_g2: g2(7),
            gamma_abc_g1: (0..=public_inputs as u64).map(|k| g1(k + 11)).collect(),
        }
    }

    #[test]
    fn artifact_round_trip() {
        let compressed = compress_verifying_key(&sample_vk(5), VKEY_FORMAT_VERSION).unwrap();
        assert_eq!(compressed.public_input_count(), 5);
        let bytes = compressed.to_bytes();
        assert_eq!(bytes.len(), HEADER_LEN + 32 * 6);
        assert_eq!(CompressedVerifyingKey::from_bytes(&bytes).unwrap(), compressed);
    }

    #[test]
    fn version_is_on_the_wire() {
        let v1 = compress_verifying_key(&sample_vk(2), 1).unwrap();
        let v2 = compress_verifying_key(&sample_vk(2), 2).unwrap();
        assert_ne!(v1.to_bytes()[..4], v2.to_bytes()[..4]);
        assert_eq!(v1.to_bytes()[4..], v2.to_bytes()[4..]);
    }

    #[test]
    fn truncated_artifact_rejected() {
        let bytes = compress_verifying_key(&sample_vk(2), 1).unwrap().to_bytes();
        assert!(CompressedVerifyingKey::from_bytes(&bytes[..50]).is_err());
        assert!(CompressedVerifyingKey::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
}
