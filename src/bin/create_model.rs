//! Writes a placeholder random-forest artifact for smoke-testing a deployment.
//! Usage: create-model [OUTPUT] (default `model.json`). The forest is randomly structured
//! and has no real detection ability.

use netlog_sentinel::model::{fingerprint, ForestModel, ModelArtifact};
use std::path::PathBuf;

const N_FEATURES: usize = 10;
const N_TREES: usize = 100;
const MAX_DEPTH: usize = 6;
const SEED: u64 = 42;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("model.json"));

    let artifact = ModelArtifact::Forest(ForestModel::placeholder(N_FEATURES, N_TREES, MAX_DEPTH, SEED));
    artifact.save(&out)?;

    let bytes = std::fs::read(&out)?;
    println!("placeholder model saved to {}", out.display());
    println!("features: {}, trees: {}, sha256: {}", N_FEATURES, N_TREES, fingerprint(&bytes));
    Ok(())
}
