//! Server configuration read from `ENDOSCREEN_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{EndoscreenError, Result};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MODEL_DIR: &str = "model";
pub const DEFAULT_LOG_FILE: &str = "logs/endoscreen.log";

/// Where formatted log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stdout,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub model_dir: PathBuf,
    /// Refuse to start without a verified `manifest.json`.
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "yes" | "YES" => Ok(true),
        "0" | "false" | "FALSE" | "no" | "NO" | "" => Ok(false),
        other => Err(EndoscreenError::Config(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `EndoscreenError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `EndoscreenError::Config` if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw =
            lookup("ENDOSCREEN_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse::<SocketAddr>().map_err(|e| {
            EndoscreenError::Config(format!("ENDOSCREEN_BIND_ADDR {bind_raw:?}: {e}"))
        })?;

        let model_dir = lookup("ENDOSCREEN_MODEL_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string());

        let require_manifest = match lookup("ENDOSCREEN_REQUIRE_MANIFEST") {
            Some(v) => parse_bool("ENDOSCREEN_REQUIRE_MANIFEST", v.trim())?,
            None => false,
        };

        let log_mode = match lookup("ENDOSCREEN_LOG_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("stdout") => LogMode::Stdout,
            Some("file") => LogMode::File,
            Some(other) => {
                return Err(EndoscreenError::Config(format!(
                    "ENDOSCREEN_LOG_MODE must be \"stdout\" or \"file\", got {other:?}"
                )))
            }
        };

        let log_file = lookup("ENDOSCREEN_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            bind_addr,
            model_dir: PathBuf::from(model_dir),
            require_manifest,
            log_mode,
            log_file: PathBuf::from(log_file),
        })
    }
}
