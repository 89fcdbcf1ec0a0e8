//! Per-installer results of a batch.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What the environment reconciler found after a runtime installer succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "path_status", rename_all = "snake_case")]
pub enum PathStatus {
    /// The search path already mentions the runtime, nothing changed.
    AlreadyOnPath,
    /// No interpreter could be located.
    InterpreterMissing,
    /// The runtime directories were prepended to the search path.
    Added { interpreter: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    SucceededRestartRequired,
    Failed,
    /// The selected technology has no silent flags, the installer was not run.
    UnknownTechnology { technology: String },
    /// A runtime installer succeeded and its search path was reconciled.
    Runtime { path: PathStatus },
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Succeeded => "Installation successful".to_string(),
            Outcome::SucceededRestartRequired => {
                "Installation successful. System restart required".to_string()
            }
            Outcome::Failed => "Installation failed".to_string(),
            Outcome::UnknownTechnology { technology } => {
                format!("Installation skipped. Unknown installer type '{}'", technology)
            }
            Outcome::Runtime { path } => match path {
                PathStatus::AlreadyOnPath => {
                    "Installation successful. 'python' is included in the PATH".to_string()
                }
                PathStatus::InterpreterMissing => "Python is not installed".to_string(),
                PathStatus::Added { interpreter } => {
                    format!("Python is installed. Path: {}", interpreter.display())
                }
            },
        }
    }

    /// Whether the batch should report this installer as not installed.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Failed | Outcome::UnknownTechnology { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Outcome::Succeeded.to_string(), "Installation successful");
        assert_eq!(
            Outcome::SucceededRestartRequired.to_string(),
            "Installation successful. System restart required"
        );
        assert_eq!(Outcome::Failed.to_string(), "Installation failed");
        assert_eq!(
            Outcome::Runtime {
                path: PathStatus::AlreadyOnPath
            }
            .to_string(),
            "Installation successful. 'python' is included in the PATH"
        );
        assert_eq!(
            Outcome::Runtime {
                path: PathStatus::InterpreterMissing
            }
            .to_string(),
            "Python is not installed"
        );
    }

    #[test]
    fn test_failures() {
        assert!(Outcome::Failed.is_failure());
        assert!(
            Outcome::UnknownTechnology {
                technology: "WiX".into()
            }
            .is_failure()
        );
        assert!(!Outcome::SucceededRestartRequired.is_failure());
        assert!(
            !Outcome::Runtime {
                path: PathStatus::InterpreterMissing
            }
            .is_failure()
        );
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Outcome::Runtime {
            path: PathStatus::Added {
                interpreter: PathBuf::from("/opt/python/bin/python"),
            },
        })
        .unwrap();
        assert_eq!(json["status"], "runtime");
        assert_eq!(json["path"]["path_status"], "added");
        assert_eq!(json["path"]["interpreter"], "/opt/python/bin/python");

        let json = serde_json::to_value(Outcome::Failed).unwrap();
        assert_eq!(json["status"], "failed");
    }
}
