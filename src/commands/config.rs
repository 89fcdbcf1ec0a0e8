use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::hints::TypeHints;
use crate::runtime::Runtime;
use crate::technology::FlagTable;

use super::paths::{default_hints_path, default_root};

/// Everything a command needs, resolved from CLI options and defaults.
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub root: PathBuf,
    pub hints: TypeHints,
    pub flags: FlagTable,
}

impl<R: Runtime> Config<R> {
    /// Resolve the artifact root and load type hints.
    ///
    /// An explicitly given hint file must exist; the default one is optional.
    pub fn new(runtime: R, root: Option<PathBuf>, hints_path: Option<PathBuf>) -> Result<Self> {
        let root = match root {
            Some(path) => path,
            None => default_root(&runtime)?,
        };
        debug!("Artifact root: {:?}", root);

        let hints = match hints_path {
            Some(path) => TypeHints::load(&runtime, &path, true)?,
            None => TypeHints::load(&runtime, &default_hints_path(&runtime)?, false)?,
        };

        Ok(Self {
            runtime,
            root,
            hints,
            flags: FlagTable::builtin(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::technology::InstallerTechnology;
    use crate::test_utils::{configure_mock_runtime_basics, test_root, test_workdir};
    use mockall::predicate::eq;

    #[test]
    fn test_config_defaults() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        runtime
            .expect_exists()
            .with(eq(test_workdir().join("options.txt")))
            .returning(|_| false);

        let config = Config::new(runtime, None, None).unwrap();
        assert_eq!(config.root, test_root());
        assert!(config.hints.rules().is_empty());
    }

    #[test]
    fn test_config_explicit_paths() {
        let mut runtime = MockRuntime::new();
        let hints = PathBuf::from("/etc/sbi/hints.txt");

        runtime
            .expect_exists()
            .with(eq(hints.clone()))
            .returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(hints.clone()))
            .returning(|_| Ok("visa=Ni-VISA".to_string()));
        runtime.expect_current_dir().never();

        let config = Config::new(runtime, Some(PathBuf::from("/srv/installers")), Some(hints)).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/installers"));
        assert_eq!(
            config.hints.resolve("ni-visa.exe"),
            InstallerTechnology::VisaInstaller
        );
    }

    #[test]
    fn test_config_missing_explicit_hints_fails() {
        let mut runtime = MockRuntime::new();
        configure_mock_runtime_basics(&mut runtime);
        runtime.expect_exists().returning(|_| false);

        let result = Config::new(runtime, None, Some(PathBuf::from("/missing.txt")));
        assert!(result.is_err());
    }
}
