use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::direct::RawConfig;

pub const DEFAULT_PROFILE: &str = "default";

/// Profile name to kubeconfig path, in insertion order.
pub type Profiles = IndexMap<String, PathBuf>;

/// The config with every field present.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub kube_auto_keep: bool,
    pub clusters: Profiles,
    pub current_kube: String,
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Config {
    /// First-run state: a single `default` profile pointing at `kubeconfig`.
    pub fn initial(kubeconfig: &Path) -> Self {
        let mut clusters = Profiles::new();
        clusters.insert(DEFAULT_PROFILE.to_owned(), kubeconfig.to_owned());
        Self {
            kube_auto_keep: false,
            clusters,
            current_kube: DEFAULT_PROFILE.to_owned(),
            extra: IndexMap::new(),
        }
    }

    /// Fills missing fields with defaults. The flag is true when anything had
    /// to be filled in and the document should be written back.
    pub fn materialize(raw: RawConfig) -> (Self, bool) {
        let healed =
            raw.kube_auto_keep.is_none() || raw.clusters.is_none() || raw.current_kube.is_none();
        let config = Self {
            kube_auto_keep: raw.kube_auto_keep.unwrap_or(false),
            clusters: raw.clusters.unwrap_or_default(),
            current_kube: raw
                .current_kube
                .unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
            extra: raw.extra,
        };
        (config, healed)
    }

    /// Path of the current profile, if it names an existing entry.
    pub fn current_path(&self) -> Option<&Path> {
        self.clusters.get(&self.current_kube).map(PathBuf::as_path)
    }
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        Self {
            kube_auto_keep: Some(config.kube_auto_keep),
            clusters: Some(config.clusters),
            current_kube: Some(config.current_kube),
            extra: config.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_documents_need_no_healing() {
        let raw: RawConfig = Config::initial(Path::new("/home/me/.kube/config")).into();
        let (config, healed) = Config::materialize(raw);
        assert!(!healed);
        assert_eq!(config.current_kube, DEFAULT_PROFILE);
        assert_eq!(
            config.current_path(),
            Some(Path::new("/home/me/.kube/config"))
        );
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let (config, healed) = Config::materialize(RawConfig::default());
        assert!(healed);
        assert!(!config.kube_auto_keep);
        assert!(config.clusters.is_empty());
        assert_eq!(config.current_kube, DEFAULT_PROFILE);
        assert_eq!(config.current_path(), None);
    }
}
