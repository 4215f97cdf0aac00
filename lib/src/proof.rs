//! Groth16 proof wire codec.
//!
//! The on-chain verifier consumes compressed curve points: a G1 point is
//! the 32-byte big-endian `x` with the top bit of the first byte set iff
//! `y` is the larger of the two square roots; a G2 point is 64 bytes,
//! `x.c1` then `x.c0` (extension coordinates are reversed on the wire),
//! with the sign taken from `y.c1`, falling back to `y.c0` when `y.c1`
//! is zero. This is a strict interop contract: one flipped sign bit or
//! swapped coordinate and every mathematically valid proof is rejected.
//!
//! The base-field modulus is below `2^254`, so the top bit of a
//! canonical `x` encoding is always free to carry the sign.

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ff::Zero;
use ark_groth16::Proof;

use crate::error::PoolError;
use crate::field::{fe_from_be_bytes, fe_to_be_bytes};

const SIGN_BIT: u8 = 0x80;

/// Wire form of a Groth16 proof `(π_a, π_b, π_c)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

impl CompressedProof {
    pub const SIZE: usize = 128;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..32].copy_from_slice(&self.a);
        out[32..96].copy_from_slice(&self.b);
        out[96..].copy_from_slice(&self.c);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PoolError> {
        if bytes.len() != Self::SIZE {
            return Err(PoolError::ProofInvalid(format!(
                "compressed proof must be {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        let mut a = [0u8; 32];
        let mut b = [0u8; 64];
        let mut c = [0u8; 32];
        a.copy_from_slice(&bytes[..32]);
        b.copy_from_slice(&bytes[32..96]);
        c.copy_from_slice(&bytes[96..]);
        Ok(Self { a, b, c })
    }
}

fn is_greatest_fq(y: &Fq) -> bool {
    *y > -*y
}

/// Sign convention over the quadratic extension: decided by `y.c1`,
/// by `y.c0` when `y.c1` is zero. Matches the lexicographic order the
/// decompressor uses to pick between a root and its negation.
fn is_greatest_fq2(y: &Fq2) -> bool {
    if y.c1.is_zero() {
        is_greatest_fq(&y.c0)
    } else {
        is_greatest_fq(&y.c1)
    }
}

/// Compress a G1 point. The point at infinity never occurs in a valid
/// proof and has no encoding.
pub fn compress_g1(point: &G1Affine) -> Result<[u8; 32], PoolError> {
    if point.infinity {
        return Err(PoolError::ProofInvalid(
            "cannot compress the point at infinity".into(),
        ));
    }
    let mut out = fe_to_be_bytes(&point.x);
    if is_greatest_fq(&point.y) {
        out[0] |= SIGN_BIT;
    }
    Ok(out)
}

/// Recover a G1 point from its compressed form. BN254's G1 has cofactor
/// one, so any on-curve point is in the right subgroup.
pub fn decompress_g1(bytes: &[u8; 32]) -> Result<G1Affine, PoolError> {
    let greatest = bytes[0] & SIGN_BIT != 0;
    let mut x_bytes = *bytes;
    x_bytes[0] &= !SIGN_BIT;
    let x: Fq = fe_from_be_bytes(&x_bytes)?;
    G1Affine::get_point_from_x_unchecked(x, greatest)
        .ok_or_else(|| PoolError::ProofInvalid("G1 x-coordinate is not on the curve".into()))
}

/// Compress a G2 point: 32 bytes of `x.c1`, then 32 bytes of `x.c0`.
pub fn compress_g2(point: &G2Affine) -> Result<[u8; 64], PoolError> {
    if point.infinity {
        return Err(PoolError::ProofInvalid(
            "cannot compress the point at infinity".into(),
        ));
    }
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&fe_to_be_bytes(&point.x.c1));
    out[32..].copy_from_slice(&fe_to_be_bytes(&point.x.c0));
    if is_greatest_fq2(&point.y) {
        out[0] |= SIGN_BIT;
    }
    Ok(out)
}

/// Recover a G2 point, rejecting anything outside the r-order subgroup.
pub fn decompress_g2(bytes: &[u8; 64]) -> Result<G2Affine, PoolError> {
    let greatest = bytes[0] & SIGN_BIT != 0;
    let mut c1_bytes = [0u8; 32];
    c1_bytes.copy_from_slice(&bytes[..32]);
    c1_bytes[0] &= !SIGN_BIT;
    let mut c0_bytes = [0u8; 32];
    c0_bytes.copy_from_slice(&bytes[32..]);
    let x = Fq2::new(fe_from_be_bytes(&c0_bytes)?, fe_from_be_bytes(&c1_bytes)?);
    let point = G2Affine::get_point_from_x_unchecked(x, greatest)
        .ok_or_else(|| PoolError::ProofInvalid("G2 x-coordinate is not on the curve".into()))?;
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(PoolError::ProofInvalid(
            "G2 point is not in the r-order subgroup".into(),
        ));
    }
    Ok(point)
}

/// Compress a full proof into the wire form the ledger program expects.
/// Pure and deterministic in the proof.
pub fn compress_proof(proof: &Proof<Bn254>) -> Result<CompressedProof, PoolError> {
    Ok(CompressedProof {
        a: compress_g1(&proof.a)?,
        b: compress_g2(&proof.b)?,
        c: compress_g1(&proof.c)?,
    })
}

/// Inverse of [`compress_proof`]; what the verifier runs before its
/// pairing check.
pub fn decompress_proof(compressed: &CompressedProof) -> Result<Proof<Bn254>, PoolError> {
    Ok(Proof {
        a: decompress_g1(&compressed.a)?,
        b: decompress_g2(&compressed.b)?,
        c: decompress_g1(&compressed.c)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ec::{AffineRepr, CurveGroup};
    use ark_ff::One;

    fn g1(k: u64) -> G1Affine {
        (G1Affine::generator() * Fr::from(k)).into_affine()
    }

    fn g2(k: u64) -> G2Affine {
        (G2Affine::generator() * Fr::from(k)).into_affine()
    }

    #[test]
    fn g1_generator_compresses_to_one() {
        // generator is (1, 2); y = 2 is the smaller root, so no sign bit
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(compress_g1(&G1Affine::generator()).unwrap(), expected);
    }

    #[test]
    fn negation_flips_only_the_sign_bit() {
        let point = G1Affine::generator();
        let pos = compress_g1(&point).unwrap();
        let neg = compress_g1(&-point).unwrap();
        assert_eq!(pos[0] & SIGN_BIT, 0);
        assert_eq!(neg[0] & SIGN_BIT, SIGN_BIT);
        let mut masked = neg;
        masked[0] &= !SIGN_BIT;
        assert_eq!(masked, pos);
    }

    #[test]
    fn g1_round_trip_both_branches() {
        for k in 1..=8u64 {
            let point = g1(k);
            for p in [point, -point] {
                let compressed = compress_g1(&p).unwrap();
                assert_eq!(decompress_g1(&compressed).unwrap(), p);
            }
        }
    }

    #[test]
    fn g2_round_trip_both_branches() {
        for k in 1..=8u64 {
            let point = g2(k);
            for p in [point, -point] {
                let compressed = compress_g2(&p).unwrap();
                assert_eq!(decompress_g2(&compressed).unwrap(), p);
            }
        }
    }

    #[test]
    fn g2_negation_flips_only_the_sign_bit() {
        let pos = compress_g2(&G2Affine::generator()).unwrap();
        let neg = compress_g2(&-G2Affine::generator()).unwrap();
        let mut masked = neg;
        masked[0] &= !SIGN_BIT;
        let mut pos_masked = pos;
        pos_masked[0] &= !SIGN_BIT;
        assert_eq!(masked, pos_masked);
        assert_ne!(pos[0] & SIGN_BIT, neg[0] & SIGN_BIT);
    }

    #[test]
    fn infinity_has_no_encoding() {
        assert!(compress_g1(&G1Affine::zero()).is_err());
        assert!(compress_g2(&G2Affine::zero()).is_err());
    }

    #[test]
    fn non_canonical_x_rejected() {
        // the base-field modulus itself, sign bit clear
        let q = fe_to_be_bytes(&-Fq::one());
        let mut modulus = q;
        modulus[31] += 1;
        assert!(matches!(
            decompress_g1(&modulus),
            Err(PoolError::InvalidFieldElement(_))
        ));
    }

    #[test]
    fn proof_round_trip() {
        let proof = Proof::<Bn254> {
            a: g1(3),
            b: g2(5),
            c: g1(7),
        };
        let compressed = compress_proof(&proof).unwrap();
        assert_eq!(decompress_proof(&compressed).unwrap(), proof);

        // and the flat 128-byte wire blob
        let bytes = compressed.to_bytes();
        assert_eq!(CompressedProof::from_bytes(&bytes).unwrap(), compressed);
        assert!(CompressedProof::from_bytes(&bytes[..100]).is_err());
    }

    #[test]
    fn compression_is_deterministic() {
        let proof = Proof::<Bn254> {
            a: g1(11),
            b: g2(13),
            c: g1(17),
        };
        assert_eq!(
            compress_proof(&proof).unwrap(),
            compress_proof(&proof).unwrap()
        );
    }
}
