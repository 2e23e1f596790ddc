//! Forwarding to the external cluster CLI with the current profile's
//! kubeconfig in its environment.

use std::ffi::OsStr;
use std::process::Command;

use tracing::debug;

use crate::error::Result;
use crate::store::Store;

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Builds the command for `program args..` with `KUBECONFIG` pointing at the
/// current profile. Everything else is inherited.
pub fn command<I, S>(store: &Store, program: impl AsRef<OsStr>, args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let kubeconfig = store.current_profile_path()?;
    debug!(kubeconfig = %kubeconfig.display(), "passing through");

    let mut cmd = Command::new(program);
    cmd.args(args).env(KUBECONFIG_ENV, kubeconfig);
    Ok(cmd)
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::path::Path;

    use super::*;
    use crate::ops;
    use tempfile::tempdir;

    #[test]
    fn kubeconfig_follows_the_current_profile() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path(), "/home/me/.kube/config");
        ops::add(
            &store,
            ops::AddRequest {
                name: "prod",
                path: Path::new("/tmp/b.yaml"),
                set_current: true,
                keep: false,
            },
        )
        .unwrap();

        let cmd = command(&store, "oc", ["get", "pods"]).unwrap();
        assert_eq!(cmd.get_program(), "oc");
        assert_eq!(
            cmd.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("get"), OsStr::new("pods")]
        );
        let env: Vec<_> = cmd.get_envs().collect();
        assert_eq!(
            env,
            vec![(OsStr::new(KUBECONFIG_ENV), Some(OsStr::new("/tmp/b.yaml")))]
        );
    }
}
