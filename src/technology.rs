//! Installer technologies and the silent-flag table.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SbiError};

/// Selector value meaning "do not install this file".
pub const EXCLUDE_CHOICE: &str = "None";

/// The packaging framework an installer was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InstallerTechnology {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "Microsoft Windows Installer")]
    Msi,
    #[serde(rename = "Inno setup")]
    InnoSetup,
    #[serde(rename = "Ni-VISA")]
    VisaInstaller,
}

impl InstallerTechnology {
    pub const ALL: [InstallerTechnology; 4] = [
        InstallerTechnology::Default,
        InstallerTechnology::Msi,
        InstallerTechnology::InnoSetup,
        InstallerTechnology::VisaInstaller,
    ];

    /// Name shown to the user and accepted in hint files.
    pub fn label(self) -> &'static str {
        match self {
            InstallerTechnology::Default => "default",
            InstallerTechnology::Msi => "Microsoft Windows Installer",
            InstallerTechnology::InnoSetup => "Inno setup",
            InstallerTechnology::VisaInstaller => "Ni-VISA",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            InstallerTechnology::Default => "default",
            InstallerTechnology::Msi => "msi",
            InstallerTechnology::InnoSetup => "inno",
            InstallerTechnology::VisaInstaller => "visa",
        }
    }
}

impl fmt::Display for InstallerTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InstallerTechnology {
    type Err = SbiError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        InstallerTechnology::ALL
            .into_iter()
            .find(|tech| {
                name.eq_ignore_ascii_case(tech.label()) || name.eq_ignore_ascii_case(tech.alias())
            })
            .ok_or_else(|| SbiError::UnknownTechnology(name.to_string()))
    }
}

/// Maps each technology to the command-line suffix that makes it install silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagTable {
    entries: IndexMap<InstallerTechnology, String>,
}

impl Default for FlagTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FlagTable {
    pub fn builtin() -> Self {
        Self::from_entries([
            (InstallerTechnology::Default, "/S"),
            (InstallerTechnology::Msi, "/QB REBOOT=Suppress"),
            (InstallerTechnology::InnoSetup, "/verysilent sp-"),
            (
                InstallerTechnology::VisaInstaller,
                "--quiet --accept-eulas --prevent-reboot",
            ),
        ])
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (InstallerTechnology, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(tech, suffix)| (tech, suffix.to_string()))
                .collect(),
        }
    }

    pub fn lookup(&self, tech: InstallerTechnology) -> Result<&str> {
        self.entries
            .get(&tech)
            .map(String::as_str)
            .ok_or_else(|| SbiError::UnknownTechnology(tech.label().to_string()))
    }

    /// Resolve a selector-supplied technology name to its silent suffix.
    pub fn resolve(&self, name: &str) -> Result<(InstallerTechnology, &str)> {
        let tech = name.parse::<InstallerTechnology>()?;
        Ok((tech, self.lookup(tech)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (InstallerTechnology, &str)> {
        self.entries.iter().map(|(tech, suffix)| (*tech, suffix.as_str()))
    }
}
