//! Circom-compatible Poseidon over BN254 `Fr`.
//!
//! One primitive, two arities: arity 1 for nullifier hashes, arity 2 for
//! commitments and tree nodes. Inputs are `Fr` values, so canonicality is
//! settled at the byte boundary (`field`) before anything reaches here.

use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

/// Poseidon(1) over a single field element.
pub fn hash_single(a: Fr) -> Fr {
    let mut pose = Poseidon::<Fr>::new_circom(1).expect("poseidon arity 1 params");
    pose.hash(&[a]).expect("poseidon failed")
}

/// Poseidon(2) over an ordered pair. Argument order is significant.
pub fn hash_pair(a: Fr, b: Fr) -> Fr {
    let mut pose = Poseidon::<Fr>::new_circom(2).expect("poseidon arity 2 params");
    pose.hash(&[a, b]).expect("poseidon failed")
}
