mod cli;

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitCode};

use anyhow::Context as _;
use clap::Parser;
use console::style;
use dialoguer::Confirm;
use tabular::{row, Table};
use tracing_subscriber::EnvFilter;

use aoc_core::ops::{self, AddRequest, Deleted};
use aoc_core::{passthrough, Store, StoreError};

use crate::cli::{Cli, Commands};

const YES: &str = "✔";

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(aoc_core::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let store = Store::open_default()?;

    match cli.command {
        Commands::List => list(&store)?,
        Commands::AddKube {
            name,
            path,
            current,
            keep,
        } => add_kube(&store, &name, &path, current, keep)?,
        Commands::SwitchKube { name } => return switch_kube(&store, &name),
        Commands::DeleteKube { name, yes } => delete_kube(&store, &name, yes)?,
        Commands::RenameKube { old, new } => return rename_kube(&store, &old, &new),
        Commands::AutoKeep { yes, no } => {
            let enabled = ops::set_auto_keep(&store, Commands::auto_keep_choice(yes, no))?;
            println!("auto keep: {}", if enabled { "on" } else { "off" });
        }
        Commands::Passthrough(args) => return run(&store, aoc_core::cli_program(), args),
    }

    Ok(ExitCode::SUCCESS)
}

fn list(store: &Store) -> anyhow::Result<()> {
    let mut table = Table::new("{:<}  {:<}  {:^}");
    table.add_row(row!("NAME", "PATH", "CURRENT"));
    for entry in ops::list(store)? {
        table.add_row(row!(
            entry.name,
            entry.path.display(),
            if entry.current { YES } else { "" }
        ));
    }
    print!("{table}");
    Ok(())
}

fn add_kube(
    store: &Store,
    name: &str,
    path: &Path,
    current: bool,
    keep: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(path.exists(), "Kubeconfig {} does not exist", path.display());
    // Absolute, but symlinks stay as given so --keep moves the link itself.
    let path = if path.is_absolute() {
        path.to_owned()
    } else {
        std::env::current_dir()
            .context("Resolving the working directory")?
            .join(path)
    };

    let added = ops::add(
        store,
        AddRequest {
            name,
            path: &path,
            set_current: current,
            keep,
        },
    )?;

    let marker = if added.current { " (current)" } else { "" };
    println!("Added {name} -> {}{marker}", added.path.display());
    Ok(())
}

fn switch_kube(store: &Store, name: &str) -> anyhow::Result<ExitCode> {
    match ops::switch(store, name) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(StoreError::NotFound(_)) => {
            eprintln!(
                "{}",
                style("[ERROR] Cluster can't be found, try to add it first.").red()
            );
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn delete_kube(store: &Store, name: &str, yes: bool) -> anyhow::Result<()> {
    if !yes
        && !Confirm::new()
            .with_prompt(format!("Remove {name}?"))
            .default(false)
            .wait_for_newline(true)
            .interact()?
    {
        println!("Aborted!");
        return Ok(());
    }

    match ops::delete(store, name)? {
        Deleted::Missing => println!("{}", style(format!("[INFO] No such cluster {name}")).blue()),
        Deleted::Removed {
            new_current: Some(successor),
        } => println!("Removed {name}, current kube is now {successor}"),
        Deleted::Removed { new_current: None } => println!("Removed {name}"),
    }
    Ok(())
}

fn rename_kube(store: &Store, old: &str, new: &str) -> anyhow::Result<ExitCode> {
    match ops::rename(store, old, new) {
        Ok(path) => {
            println!("Renamed {old} -> {new} ({})", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ (StoreError::NotFound(_) | StoreError::AlreadyExists(_))) => {
            eprintln!("{}", style(format!("[ERROR] {e}")).red());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Hands over to `program` with the current kubeconfig.
fn run(store: &Store, program: OsString, args: Vec<String>) -> anyhow::Result<ExitCode> {
    let cmd = passthrough::command(store, &program, args)?;
    exec(cmd).with_context(|| format!("Launching {}", program.to_string_lossy()))
}

/// Replaces this process; only returns on failure.
#[cfg(unix)]
fn exec(mut cmd: Command) -> anyhow::Result<ExitCode> {
    use std::os::unix::process::CommandExt;
    Err(cmd.exec().into())
}

/// Waits for the child and forwards its exit code.
#[cfg(not(unix))]
fn exec(mut cmd: Command) -> anyhow::Result<ExitCode> {
    let status = cmd.status()?;
    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
