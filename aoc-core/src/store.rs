//! File-backed profile registry.
//!
//! Every accessor re-reads `config.yaml` and every mutator rewrites it whole.
//! There is no locking: two processes mutating at once race, and the last
//! writer wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::clean::{Config, Profiles};
use crate::direct::RawConfig;
use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "config.yaml";
pub const MANAGED_DIR: &str = "clusters";
pub const MANAGED_FILE: &str = "kubeconfig";

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    default_kubeconfig: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>, default_kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            default_kubeconfig: default_kubeconfig.into(),
        }
    }

    /// A store rooted at `$AOC_HOME` (or `~/.aoc`), falling back to
    /// `~/.kube/config`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::aoc_dir()?, crate::default_kubeconfig_path()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn default_kubeconfig(&self) -> &Path {
        &self.default_kubeconfig
    }

    pub fn managed_dir(&self, name: &str) -> PathBuf {
        self.root.join(MANAGED_DIR).join(name)
    }

    /// Where a kept kubeconfig for `name` lives.
    pub fn managed_path(&self, name: &str) -> PathBuf {
        self.managed_dir(name).join(MANAGED_FILE)
    }

    // region: Whole-file access

    /// Loads the config, creating it on first use and writing back defaults
    /// for any field a hand edit removed.
    pub fn read(&self) -> Result<Config> {
        let path = self.config_path();
        let raw = match RawConfig::read_from(&path)? {
            Some(raw) => raw,
            None => {
                fs::create_dir_all(&self.root).map_err(StoreError::io("creating", &self.root))?;
                let config = Config::initial(&self.default_kubeconfig);
                self.write(config.clone())?;
                debug!(path = %path.display(), "created config with defaults");
                return Ok(config);
            }
        };

        let (config, healed) = Config::materialize(raw);
        if healed {
            debug!(path = %path.display(), "filling in missing config fields");
            self.write(config.clone())?;
        }
        Ok(config)
    }

    pub fn write(&self, config: Config) -> Result<()> {
        let path = self.config_path();
        debug!(path = %path.display(), "writing config");
        RawConfig::from(config).write_to(&path)
    }

    fn update(&self, edit: impl FnOnce(&mut Config)) -> Result<()> {
        let mut config = self.read()?;
        edit(&mut config);
        self.write(config)
    }

    // endregion

    // region: Accessors

    pub fn profiles(&self) -> Result<Profiles> {
        Ok(self.read()?.clusters)
    }

    pub fn set_profiles(&self, profiles: Profiles) -> Result<()> {
        self.update(|config| config.clusters = profiles)
    }

    pub fn profile_exists(&self, name: &str) -> Result<bool> {
        Ok(self.profiles()?.contains_key(name))
    }

    pub fn current_profile(&self) -> Result<String> {
        Ok(self.read()?.current_kube)
    }

    /// Does not check that `name` exists.
    pub fn set_current_profile(&self, name: &str) -> Result<()> {
        self.update(|config| config.current_kube = name.to_owned())
    }

    /// The current profile's kubeconfig, or the default kubeconfig when the
    /// current name is dangling.
    pub fn current_profile_path(&self) -> Result<PathBuf> {
        let config = self.read()?;
        Ok(config
            .current_path()
            .unwrap_or(&self.default_kubeconfig)
            .to_owned())
    }

    pub fn auto_keep(&self) -> Result<bool> {
        Ok(self.read()?.kube_auto_keep)
    }

    pub fn set_auto_keep(&self, auto_keep: bool) -> Result<()> {
        self.update(|config| config.kube_auto_keep = auto_keep)
    }

    // endregion

    // region: Managed storage

    /// Moves `source` into the managed directory for `name` and returns the
    /// new location. A failed move is logged and the managed path is returned
    /// anyway; the source stays where it was.
    pub fn adopt(&self, name: &str, source: &Path) -> Result<PathBuf> {
        let dir = self.managed_dir(name);
        let dest = dir.join(MANAGED_FILE);

        fs::create_dir_all(&dir).map_err(StoreError::io("creating", &dir))?;
        if !dest.exists() {
            fs::File::create(&dest).map_err(StoreError::io("creating", &dest))?;
        }

        if is_same_file(source, &dest) {
            debug!(path = %dest.display(), "kubeconfig already in managed storage");
            return Ok(dest);
        }

        match move_file(source, &dest) {
            Ok(()) => info!(
                from = %source.display(),
                to = %dest.display(),
                "moved kubeconfig into managed storage"
            ),
            Err(e) => warn!(
                from = %source.display(),
                to = %dest.display(),
                "could not move kubeconfig: {e}"
            ),
        }

        Ok(dest)
    }

    /// Deletes the managed directory for `name`. Absence is fine.
    pub fn remove_managed_dir(&self, name: &str) -> Result<()> {
        let dir = self.managed_dir(name);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!(path = %dir.display(), "removed managed directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io("removing", dir)(e)),
        }
    }

    pub fn rename_managed_dir(&self, old: &str, new: &str) -> Result<()> {
        let from = self.managed_dir(old);
        let to = self.managed_dir(new);
        fs::rename(&from, &to).map_err(StoreError::io("renaming", &from))?;
        info!(from = %from.display(), to = %to.display(), "renamed managed directory");
        Ok(())
    }

    // endregion
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `rename`, falling back to copy and remove when the two paths are on
/// different filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Err(e) = fs::rename(from, to) {
        debug!("rename failed ({e}), copying instead");
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
