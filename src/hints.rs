//! Keyword hints that pick a default installer technology from a file name.
//!
//! Hint files hold one `keyword=technology` mapping per line:
//!
//! ```text
//! # lines starting with '#' are comments
//! msi=Microsoft Windows Installer
//! setup=Inno setup
//! visa=Ni-VISA
//! ```
//!
//! Rules are evaluated in file order and the first keyword contained in the
//! file name wins.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use std::path::Path;
use std::str::FromStr;

use crate::error::SbiError;
use crate::runtime::Runtime;
use crate::technology::InstallerTechnology;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRule {
    pub keyword: String,
    pub technology: InstallerTechnology,
}

/// Ordered keyword rules, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHints {
    rules: Vec<HintRule>,
}

impl TypeHints {
    pub fn new(rules: Vec<HintRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[HintRule] {
        &self.rules
    }

    /// Default technology for `file_name`: the first rule whose keyword is a
    /// substring of the name, otherwise [`InstallerTechnology::Default`].
    pub fn resolve(&self, file_name: &str) -> InstallerTechnology {
        self.rules
            .iter()
            .find(|rule| file_name.contains(&rule.keyword))
            .map(|rule| rule.technology)
            .unwrap_or(InstallerTechnology::Default)
    }

    /// Load hints from `path`.
    ///
    /// A missing file is an error when `required` is set, otherwise it yields no rules.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path, required: bool) -> Result<Self> {
        if !runtime.exists(path) {
            if required {
                anyhow::bail!("Type hint file {} does not exist", path.display());
            }
            warn!(
                "Type hint file {} not found, every installer defaults to '{}'",
                path.display(),
                InstallerTechnology::Default
            );
            return Ok(Self::default());
        }

        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read type hints from {}", path.display()))?;
        let hints = content
            .parse::<TypeHints>()
            .with_context(|| format!("Failed to load type hints from {}", path.display()))?;
        debug!("Loaded {} type hint(s) from {:?}", hints.rules.len(), path);
        Ok(hints)
    }
}

impl FromStr for TypeHints {
    type Err = SbiError;

    fn from_str(content: &str) -> Result<Self, SbiError> {
        // Repeated keywords keep their first position but take the last value
        let mut mappings: IndexMap<String, InstallerTechnology> = IndexMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let invalid = |reason: &str| SbiError::Config {
                line: index + 1,
                content: line.to_string(),
                reason: reason.to_string(),
            };

            let mut parts = line.split('=');
            let (Some(keyword), Some(technology), None) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(invalid("expected exactly one '=' (keyword=technology)"));
            };

            let keyword = keyword.trim();
            let technology = technology.trim();
            if keyword.is_empty() {
                return Err(invalid("keyword is empty"));
            }
            if technology.is_empty() {
                return Err(invalid("technology is empty"));
            }

            let technology = technology
                .parse::<InstallerTechnology>()
                .map_err(|e| invalid(&e.to_string()))?;
            mappings.insert(keyword.to_string(), technology);
        }

        Ok(Self::new(
            mappings
                .into_iter()
                .map(|(keyword, technology)| HintRule {
                    keyword,
                    technology,
                })
                .collect(),
        ))
    }
}
