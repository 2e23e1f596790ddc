use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the home directory")]
    NoHomeDir,
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("serializing config: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("no such profile '{0}'")]
    NotFound(String),
    #[error("profile '{0}' already exists")]
    AlreadyExists(String),
    #[error("'{0}' is not a valid profile name")]
    InvalidName(String),
}

impl StoreError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| StoreError::Io {
            action,
            path,
            source,
        }
    }
}
