//! Artifact manifest: SHA-256 digests binding the model files.
//!
//! `manifest.json` lives next to the artifacts. When present, every artifact
//! the server loads must be listed and must hash to the recorded digest.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ArtifactError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const MANIFEST_VERSION: u32 = 1;

/// Allowed clock skew for `created_at` (seconds).
const MAX_FUTURE_SKEW_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    /// Monotonic export number chosen by the pipeline.
    pub serial: u64,
    /// Unix timestamp (seconds) of the export.
    pub created_at: i64,
    /// Artifact file name -> lowercase hex SHA-256.
    pub files: BTreeMap<String, String>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// Constant-time compare for ASCII strings (hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Manifest entries must name a plain file inside the model directory.
fn check_file_name(name: &str) -> Result<(), ArtifactError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
        && Path::new(name).is_relative();
    if plain {
        Ok(())
    } else {
        Err(ArtifactError::Integrity(format!(
            "manifest entry {name:?} is not a plain file name"
        )))
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ModelManifest {
    /// Hash `files` inside `model_dir` into a new manifest.
    ///
    /// `serial` defaults to the creation timestamp.
    ///
    /// # Errors
    /// Returns `ArtifactError::Io` if any file cannot be read.
    pub fn build(
        model_dir: &Path,
        files: &[&str],
        serial: Option<u64>,
    ) -> Result<Self, ArtifactError> {
        let mut digests = BTreeMap::new();
        for name in files {
            check_file_name(name)?;
            let bytes = read_file(&model_dir.join(name))?;
            digests.insert((*name).to_string(), sha256_hex(&bytes));
        }

        let created_at = unix_now();
        let serial = serial.unwrap_or_else(|| u64::try_from(created_at).unwrap_or(1).max(1));

        Ok(Self {
            version: MANIFEST_VERSION,
            serial,
            created_at,
            files: digests,
        })
    }

    /// Write the manifest as pretty JSON into `model_dir`.
    ///
    /// # Errors
    /// Returns `ArtifactError::Io` if the file cannot be written.
    pub fn write(&self, model_dir: &Path) -> Result<PathBuf, ArtifactError> {
        let path = model_dir.join(MANIFEST_FILE);
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, bytes).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Verify the manifest in `model_dir`, if any.
    ///
    /// Returns `Ok(None)` when no manifest exists and `require` is false.
    ///
    /// # Errors
    /// Returns `ArtifactError::MissingManifest` if `require` is set and no
    /// manifest exists, `ArtifactError::Integrity` if the manifest is stale,
    /// malformed, or does not bind every file in `required_files`.
    pub fn verify(
        model_dir: &Path,
        required_files: &[&str],
        require: bool,
    ) -> Result<Option<Self>, ArtifactError> {
        let manifest_path = model_dir.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            if require {
                tracing::error!("No {MANIFEST_FILE} found in {:?}", model_dir);
                return Err(ArtifactError::MissingManifest(model_dir.to_path_buf()));
            }
            tracing::warn!(
                "Loading model artifacts from {:?} without {MANIFEST_FILE}; integrity is not checked",
                model_dir
            );
            return Ok(None);
        }

        let content = read_file(&manifest_path)?;
        let manifest: Self =
            serde_json::from_slice(&content).map_err(|source| ArtifactError::Json {
                path: manifest_path.clone(),
                source,
            })?;

        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::Integrity(format!(
                "unsupported manifest version: {}",
                manifest.version
            )));
        }
        if manifest.created_at > unix_now() + MAX_FUTURE_SKEW_SECS {
            return Err(ArtifactError::Integrity(
                "manifest created_at is in the future".into(),
            ));
        }

        for name in required_files {
            if !manifest.files.contains_key(*name) {
                return Err(ArtifactError::Integrity(format!(
                    "{MANIFEST_FILE} does not bind {name}"
                )));
            }
        }

        for (name, expected_hex) in &manifest.files {
            check_file_name(name)?;
            let bytes = read_file(&model_dir.join(name))?;
            if !constant_time_eq_str(&sha256_hex(&bytes), &expected_hex.to_ascii_lowercase()) {
                return Err(ArtifactError::Integrity(format!(
                    "file hash mismatch for {name}"
                )));
            }
        }

        tracing::info!(
            "Model manifest verified (serial={}, files={})",
            manifest.serial,
            manifest.files.len()
        );
        Ok(Some(manifest))
    }
}
