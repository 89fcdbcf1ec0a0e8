use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::artifact::{Artifact, discover_artifacts};
use crate::runtime::Runtime;
use crate::technology::InstallerTechnology;

use super::config::Config;

/// A discovered installer with the technology it defaults to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEntry {
    #[serde(flatten)]
    pub artifact: Artifact,
    pub path: PathBuf,
    pub technology: InstallerTechnology,
    pub flags: String,
}

/// Discover installers and resolve their default technology and flags.
#[tracing::instrument(skip(config))]
pub fn artifact_entries<R: Runtime>(config: &Config<R>) -> Result<Vec<ArtifactEntry>> {
    discover_artifacts(&config.runtime, &config.root)?
        .into_iter()
        .map(|artifact| -> Result<ArtifactEntry> {
            let technology = config.hints.resolve(&artifact.name);
            let flags = config.flags.lookup(technology)?.to_string();
            Ok(ArtifactEntry {
                path: artifact.path(&config.root),
                artifact,
                technology,
                flags,
            })
        })
        .collect()
}

pub(crate) fn write_entries<W: Write>(out: &mut W, entries: &[ArtifactEntry], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, entries)?;
        writeln!(out)?;
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.artifact.name.len())
        .max()
        .unwrap_or(0);
    for entry in entries {
        writeln!(
            out,
            "{:<width$}  {} ({})",
            entry.artifact.name,
            entry.technology,
            entry.flags,
            width = width
        )?;
    }
    Ok(())
}

/// List discovered installers with their default technology
#[tracing::instrument(skip(config))]
pub fn list<R: Runtime>(config: Config<R>, json: bool) -> Result<()> {
    let entries = artifact_entries(&config)?;
    debug!("Listing {} installer(s)", entries.len());

    if entries.is_empty() && !json {
        println!("No installers found in {}.", config.root.display());
        return Ok(());
    }

    write_entries(&mut io::stdout().lock(), &entries, json)
}
