//! The config document exactly as it sits on disk. Every field is optional so
//! hand-edited files still load; [`crate::clean::Config`] fills the gaps.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::fs;

use indexmap::IndexMap;
use serde::*;
use serde_yaml::Value as YamlValue;

use crate::error::{Result, StoreError};

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kube_auto_keep: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<IndexMap<String, PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_kube: Option<String>,
    /// Keys we do not know about, carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl RawConfig {
    /// Reads the document at `path`. A missing file, an empty file and a
    /// null document all come back as `None`.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Option<RawConfig>> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("reading", path)(e)),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_yaml::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Replaces the file at `path` with this document.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).map_err(StoreError::Serialize)?;
        fs::write(path, yaml).map_err(StoreError::io("writing", path))
    }
}
