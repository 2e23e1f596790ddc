use anyhow::Context;
use aoc_core::Store;
use tracing_subscriber::EnvFilter;

/// Prints the kubeconfig path of the current aoc profile, for
/// `export KUBECONFIG=$(current-kube)`.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(aoc_core::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let store = Store::open_default()?;
    let path = store
        .current_profile_path()
        .context("Resolving the current kube")?;
    println!("{}", path.display());

    Ok(())
}
