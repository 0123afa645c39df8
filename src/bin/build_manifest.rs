//! Manifest builder for Endoscreen model artifacts.
//!
//! Hashes the four model artifacts and writes `manifest.json` next to them,
//! which the server verifies at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin build_manifest -- <model_dir> [--serial <n>]
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use endoscreen::adapters::sklearn::{ModelManifest, SklearnModels, ARTIFACT_FILES};

fn usage() -> anyhow::Error {
    anyhow!("Usage: build_manifest <model_dir> [--serial <u64>]")
}

fn parse_args() -> Result<(PathBuf, Option<u64>)> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut serial: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serial" => {
                let v = args.next().ok_or_else(usage)?;
                let parsed = v
                    .trim()
                    .parse::<u64>()
                    .context("--serial must be a u64")?;
                serial = Some(parsed);
            }
            "-h" | "--help" => return Err(usage()),
            _ => {
                if model_dir.is_some() {
                    return Err(usage());
                }
                model_dir = Some(PathBuf::from(arg));
            }
        }
    }

    let model_dir = model_dir.ok_or_else(usage)?;
    Ok((model_dir, serial))
}

fn main() -> Result<()> {
    let (model_dir, serial) = parse_args()?;

    if !model_dir.is_dir() {
        bail!("{model_dir:?} is not a directory");
    }

    // Refuse to bind artifacts the server would reject anyway. The existing
    // manifest, if any, is about to be replaced and is not consulted.
    SklearnModels::load_unverified(&model_dir)
        .with_context(|| format!("Artifacts in {model_dir:?} do not load"))?;

    let manifest = ModelManifest::build(&model_dir, &ARTIFACT_FILES, serial)?;
    let path = manifest.write(&model_dir)?;

    println!("Wrote {}", path.display());
    println!("  serial={}", manifest.serial);
    for (name, digest) in &manifest.files {
        println!("  {name}: {digest}");
    }
    Ok(())
}
