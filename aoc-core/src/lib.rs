pub mod clean;
pub mod direct;
pub mod error;
pub mod ops;
pub mod passthrough;
pub mod store;

use std::ffi::OsString;
use std::path::PathBuf;

pub use clean::*;
pub use error::{Result, StoreError};
pub use store::Store;

/// Overrides the store root (`~/.aoc`).
pub const HOME_ENV: &str = "AOC_HOME";
/// Overrides the program launched by passthrough.
pub const CLI_ENV: &str = "AOC_CLI";
/// `tracing_subscriber::EnvFilter` directives for the binaries.
pub const LOG_ENV: &str = "AOC_LOG";

pub const DEFAULT_CLI: &str = "oc";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(StoreError::NoHomeDir)
}

pub fn kube_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".kube"))
}

/// The conventional kubeconfig location, used when the current profile
/// does not resolve.
pub fn default_kubeconfig_path() -> Result<PathBuf> {
    Ok(kube_dir()?.join("config"))
}

pub fn aoc_dir() -> Result<PathBuf> {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(home_dir()?.join(".aoc")),
    }
}

pub fn cli_program() -> OsString {
    match std::env::var_os(CLI_ENV) {
        Some(program) if !program.is_empty() => program,
        _ => OsString::from(DEFAULT_CLI),
    }
}
