//! Profile operations behind the `aoc` subcommands. Each one is a plain
//! read-modify-write against the [`Store`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub name: String,
    pub path: PathBuf,
    pub current: bool,
}

pub fn list(store: &Store) -> Result<Vec<ProfileEntry>> {
    let config = store.read()?;
    Ok(config
        .clusters
        .into_iter()
        .map(|(name, path)| ProfileEntry {
            current: name == config.current_kube,
            name,
            path,
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct AddRequest<'a> {
    pub name: &'a str,
    pub path: &'a Path,
    /// Make this the current profile even if another one is.
    pub set_current: bool,
    /// Move the kubeconfig into managed storage regardless of auto-keep.
    pub keep: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    /// Where the profile points now; differs from the request when kept.
    pub path: PathBuf,
    pub current: bool,
}

pub fn add(store: &Store, req: AddRequest<'_>) -> Result<Added> {
    validate_name(req.name)?;

    let path = if req.keep || store.auto_keep()? {
        store.adopt(req.name, req.path)?
    } else {
        req.path.to_owned()
    };

    let mut profiles = store.profiles()?;
    profiles.insert(req.name.to_owned(), path.clone());
    store.set_profiles(profiles)?;

    let current = store.current_profile()?;
    let promote = req.set_current || !store.profile_exists(&current)?;
    if promote {
        store.set_current_profile(req.name)?;
    }
    debug!(name = req.name, path = %path.display(), promote, "added profile");

    Ok(Added {
        path,
        current: promote || current == req.name,
    })
}

/// Makes `name` current. Fails with [`StoreError::NotFound`] and leaves the
/// config alone if there is no such profile.
pub fn switch(store: &Store, name: &str) -> Result<()> {
    if !store.profile_exists(name)? {
        return Err(StoreError::NotFound(name.to_owned()));
    }
    store.set_current_profile(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deleted {
    /// Nothing by that name; nothing changed.
    Missing,
    Removed {
        /// Set when the deleted profile was current and another took over.
        new_current: Option<String>,
    },
}

pub fn delete(store: &Store, name: &str) -> Result<Deleted> {
    let mut profiles = store.profiles()?;
    if profiles.shift_remove(name).is_none() {
        return Ok(Deleted::Missing);
    }
    let successor = profiles.keys().next().cloned();
    store.set_profiles(profiles)?;

    let mut new_current = None;
    if store.current_profile()? == name {
        if let Some(successor) = successor {
            store.set_current_profile(&successor)?;
            new_current = Some(successor);
        }
    }

    // A hand-edited name like "" would resolve to the whole managed tree.
    if validate_name(name).is_ok() {
        store.remove_managed_dir(name)?;
    }
    Ok(Deleted::Removed { new_current })
}

/// Renames `old` to `new`, keeping its position, its current-ness and, when
/// it lives in managed storage, its managed directory.
pub fn rename(store: &Store, old: &str, new: &str) -> Result<PathBuf> {
    validate_name(new)?;

    let profiles = store.profiles()?;
    let old_path = profiles
        .get(old)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(old.to_owned()))?;
    if old == new {
        return Ok(old_path);
    }
    if profiles.contains_key(new) {
        return Err(StoreError::AlreadyExists(new.to_owned()));
    }

    let new_path = if validate_name(old).is_ok() && old_path == store.managed_path(old) {
        store.rename_managed_dir(old, new)?;
        store.managed_path(new)
    } else {
        old_path
    };

    let renamed = profiles
        .into_iter()
        .map(|(name, path)| {
            if name == old {
                (new.to_owned(), new_path.clone())
            } else {
                (name, path)
            }
        })
        .collect();
    store.set_profiles(renamed)?;

    if store.current_profile()? == old {
        store.set_current_profile(new)?;
    }

    Ok(new_path)
}

/// `None` leaves the flag as it is. Returns the flag's value afterwards.
pub fn set_auto_keep(store: &Store, value: Option<bool>) -> Result<bool> {
    match value {
        Some(value) => {
            store.set_auto_keep(value)?;
            Ok(value)
        }
        None => store.auto_keep(),
    }
}

/// Names double as managed directory names, so they must be a single path
/// component.
fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if invalid {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}
