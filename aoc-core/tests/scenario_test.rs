use std::fs;
use std::path::{Path, PathBuf};

use aoc_core::ops::{self, AddRequest};
use aoc_core::{Profiles, Store, StoreError};
use tempfile::{tempdir, TempDir};

fn fresh_store() -> (TempDir, Store) {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("aoc"), dir.path().join("kube/config"));
    // Start from an empty registry, as if the default entry had been removed.
    store.set_profiles(Profiles::new()).unwrap();
    (dir, store)
}

fn add(store: &Store, name: &str, path: &Path, set_current: bool, keep: bool) -> PathBuf {
    ops::add(
        store,
        AddRequest {
            name,
            path,
            set_current,
            keep,
        },
    )
    .unwrap()
    .path
}

fn current(store: &Store) -> String {
    ops::list(store)
        .unwrap()
        .into_iter()
        .find(|entry| entry.current)
        .map(|entry| entry.name)
        .unwrap_or_default()
}

#[test]
fn add_switch_delete_walkthrough() {
    let (_dir, store) = fresh_store();

    add(&store, "dev", Path::new("/tmp/a.yaml"), false, false);
    assert_eq!(ops::list(&store).unwrap().len(), 1);
    assert_eq!(current(&store), "dev");

    add(&store, "prod", Path::new("/tmp/b.yaml"), true, false);
    assert_eq!(ops::list(&store).unwrap().len(), 2);
    assert_eq!(current(&store), "prod");

    ops::switch(&store, "dev").unwrap();
    assert_eq!(current(&store), "dev");

    ops::delete(&store, "prod").unwrap();
    let entries = ops::list(&store).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "dev");
    assert!(entries[0].current);
}

#[test]
fn unique_adds_are_all_recorded() {
    let (_dir, store) = fresh_store();
    let wanted: Vec<(String, PathBuf)> = (0..8)
        .map(|i| (format!("cluster-{i}"), PathBuf::from(format!("/tmp/{i}.yaml"))))
        .collect();

    for (name, path) in &wanted {
        add(&store, name, path, false, false);
    }

    let profiles = store.profiles().unwrap();
    assert_eq!(profiles.into_iter().collect::<Vec<_>>(), wanted);
}

#[test]
fn keep_moves_the_kubeconfig() {
    let (dir, store) = fresh_store();
    let source = dir.path().join("c.yaml");
    fs::write(&source, "kind: Config\n").unwrap();

    let path = add(&store, "staging", &source, false, true);
    assert_eq!(path, store.managed_path("staging"));
    assert!(path.starts_with(store.root().join("clusters").join("staging")));
    assert!(!source.exists());
    assert_eq!(store.profiles().unwrap()["staging"], path);
}

#[test]
fn deleting_current_always_leaves_a_live_current() {
    let names = ["a", "b", "c", "d"];
    for victim in names {
        let (_dir, store) = fresh_store();
        for name in names {
            add(&store, name, Path::new("/tmp/x.yaml"), false, false);
        }
        ops::switch(&store, victim).unwrap();
        ops::delete(&store, victim).unwrap();

        let now = store.current_profile().unwrap();
        assert_ne!(now, victim);
        assert!(store.profile_exists(&now).unwrap());
    }
}

#[test]
fn switch_to_unknown_is_not_found() {
    let (_dir, store) = fresh_store();
    add(&store, "dev", Path::new("/tmp/a.yaml"), false, false);

    assert!(matches!(
        ops::switch(&store, "qa"),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(store.current_profile().unwrap(), "dev");
}

#[test]
fn rename_keeps_current() {
    let (_dir, store) = fresh_store();
    add(&store, "x", Path::new("/tmp/a.yaml"), false, false);
    add(&store, "other", Path::new("/tmp/b.yaml"), false, false);
    assert_eq!(store.current_profile().unwrap(), "x");

    ops::rename(&store, "x", "y").unwrap();
    assert_eq!(store.current_profile().unwrap(), "y");
    assert_eq!(
        store.current_profile_path().unwrap(),
        PathBuf::from("/tmp/a.yaml")
    );
}

#[test]
fn hand_edited_files_heal_themselves() {
    let (_dir, store) = fresh_store();
    fs::write(
        store.config_path(),
        "clusters:\n  dev: /tmp/a.yaml\ncurrent_kube: dev\n",
    )
    .unwrap();

    assert!(!store.auto_keep().unwrap());
    let written = fs::read_to_string(store.config_path()).unwrap();
    assert!(written.contains("kube_auto_keep: false"));
    assert!(written.contains("current_kube: dev"));
}
