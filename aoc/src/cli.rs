use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Multi-cluster management.
///
/// Any command not listed below is handed to the cluster CLI (`oc`, or
/// `$AOC_CLI`) with KUBECONFIG set to the current kube.
#[derive(Parser, Debug)]
#[clap(name = "aoc", version, disable_help_subcommand = true)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show list of kubeconfigs
    List,
    /// Add a new cluster to aoc
    AddKube {
        /// Kube name, must be unique
        #[clap(short, long)]
        name: String,
        /// Kubeconfig path
        #[clap(short, long, parse(from_os_str))]
        path: PathBuf,
        /// Set this kubeconfig as current kubeconfig
        #[clap(short, long)]
        current: bool,
        /// Move kubeconfig into ~/.aoc
        #[clap(short, long)]
        keep: bool,
    },
    /// Set the current kube
    SwitchKube { name: String },
    /// Remove a cluster from aoc
    DeleteKube {
        name: String,
        /// Don't ask for confirmation
        #[clap(short, long)]
        yes: bool,
    },
    /// Rename a cluster, moving its kept kubeconfig along
    RenameKube { old: String, new: String },
    /// Enable/disable auto keep
    AutoKeep {
        #[clap(long, conflicts_with = "no")]
        yes: bool,
        #[clap(long)]
        no: bool,
    },
    #[clap(external_subcommand)]
    Passthrough(Vec<String>),
}

impl Commands {
    /// `auto-keep` flags as a tri-state: neither flag means "leave it".
    pub fn auto_keep_choice(yes: bool, no: bool) -> Option<bool> {
        match (yes, no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
