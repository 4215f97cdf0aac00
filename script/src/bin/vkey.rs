//! Turn a snarkjs `verification_key.json` into the compressed artifact
//! the on-chain verifier embeds. Run once per circuit version; bump
//! `--key-version` whenever the circuit changes, since older proofs are
//! incompatible with the new key by construction.

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_groth16::VerifyingKey;
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use shroud_lib::field::fe_from_decimal;
use shroud_lib::vkey::{compress_verifying_key, VKEY_FORMAT_VERSION};

#[derive(Parser)]
struct Args {
    /// snarkjs verification_key.json produced by the trusted setup.
    #[arg(long)]
    vk_json: PathBuf,
    /// Where to write the compressed artifact.
    #[arg(long, default_value = "verifying_key.bin")]
    out: PathBuf,
    /// Artifact format version embedded in the bundle.
    #[arg(long, default_value_t = VKEY_FORMAT_VERSION)]
    key_version: u32,
}

/// snarkjs interchange shape: projective points as decimal strings.
#[derive(Deserialize)]
struct SnarkjsVerifyingKey {
    protocol: String,
    curve: String,
    #[serde(rename = "nPublic")]
    n_public: usize,
    vk_alpha_1: Vec<String>,
    vk_beta_2: Vec<Vec<String>>,
    vk_gamma_2: Vec<Vec<String>>,
    vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    ic: Vec<Vec<String>>,
}

fn g1_from_projective(coords: &[String]) -> Result<G1Affine> {
    let [x, y, z] = coords else {
        bail!("G1 point must have 3 projective coordinates, got {}", coords.len());
    };
    if z.as_str() != "1" {
        bail!("expected affine-normalized G1 point (z = 1), got z = {z}");
    }
    let point = G1Affine::new_unchecked(fe_from_decimal::<Fq>(x)?, fe_from_decimal::<Fq>(y)?);
    if !point.is_on_curve() {
        bail!("G1 point is not on the curve");
    }
    Ok(point)
}

fn g2_from_projective(coords: &[Vec<String>]) -> Result<G2Affine> {
    let [x, y, z] = coords else {
        bail!("G2 point must have 3 projective coordinates, got {}", coords.len());
    };
    if z.len() != 2 || z[0] != "1" || z[1] != "0" {
        bail!("expected affine-normalized G2 point (z = [1, 0])");
    }
    let fq2 = |pair: &[String]| -> Result<Fq2> {
        let [c0, c1] = pair else {
            bail!("G2 coordinate must have 2 components, got {}", pair.len());
        };
        Ok(Fq2::new(fe_from_decimal(c0)?, fe_from_decimal(c1)?))
    };
    let point = G2Affine::new_unchecked(fq2(x)?, fq2(y)?);
    if !point.is_on_curve() {
        bail!("G2 point is not on the curve");
    }
    if !point.is_in_correct_subgroup_assuming_on_curve() {
        bail!("G2 point is not in the r-order subgroup");
    }
    Ok(point)
}

fn parse_snarkjs_vk(json: &str) -> Result<(VerifyingKey<Bn254>, usize)> {
    let raw: SnarkjsVerifyingKey =
        serde_json::from_str(json).context("failed to parse verification key json")?;
    if raw.protocol != "groth16" {
        bail!("unsupported protocol {:?}", raw.protocol);
    }
    if raw.curve != "bn128" {
        bail!("unsupported curve {:?}", raw.curve);
    }
    if raw.ic.len() != raw.n_public + 1 {
        bail!(
            "IC has {} points but nPublic = {} needs {}",
            raw.ic.len(),
            raw.n_public,
            raw.n_public + 1
        );
    }
    let vk = VerifyingKey {
        alpha_g1: g1_from_projective(&raw.vk_alpha_1)?,
        beta_g2: g2_from_projective(&raw.vk_beta_2)?,
        gamma_g2: g2_from_projective(&raw.vk_gamma_2)?,
        delta_g2: g2_from_projective(&raw.vk_delta_2)?,
        gamma_abc_g1: raw
            .ic
            .iter()
            .map(|coords| g1_from_projective(coords))
            .collect::<Result<Vec<_>>>()?,
    };
    Ok((vk, raw.n_public))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let json = fs::read_to_string(&args.vk_json)
        .with_context(|| format!("failed to read {}", args.vk_json.display()))?;
    let (vk, n_public) = parse_snarkjs_vk(&json)?;

    let compressed = compress_verifying_key(&vk, args.key_version)
        .context("verification key contains a non-compressible point")?;
    let bytes = compressed.to_bytes();
    fs::write(&args.out, &bytes)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    info!(
        version = args.key_version,
        public_inputs = n_public,
        bytes = bytes.len(),
        out = %args.out.display(),
        "wrote compressed verification key"
    );
    println!("alpha_g1 0x{}", hex::encode(compressed.alpha_g1));
    println!("beta_g2  0x{}", hex::encode(compressed.beta_g2));
    println!("gamma_g2 0x{}", hex::encode(compressed.gamma_g2));
    println!("delta_g2 0x{}", hex::encode(compressed.delta_g2));
    for (i, point) in compressed.ic.iter().enumerate() {
        println!("ic[{i}]    0x{}", hex::encode(point));
    }
    Ok(())
}
