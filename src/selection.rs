//! The set of installers confirmed for the next batch.
//!
//! A selector (the CLI here) fills the selection, starting from every
//! discovered installer with its hinted technology, then narrowing and
//! overriding it. The engine drains the selection when it runs a batch.

use glob::Pattern;
use indexmap::IndexMap;
use serde::Serialize;

use crate::artifact::Artifact;
use crate::error::{Result, SbiError};
use crate::hints::TypeHints;
use crate::technology::EXCLUDE_CHOICE;

/// An installer together with the technology name chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedArtifact {
    pub artifact: Artifact,
    pub technology: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: IndexMap<String, SelectedArtifact>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every artifact with the technology the hints resolve for it.
    pub fn from_defaults(artifacts: &[Artifact], hints: &TypeHints) -> Self {
        let mut selection = Self::new();
        for artifact in artifacts {
            let technology = hints.resolve(&artifact.name);
            selection.choose(artifact, technology.label());
        }
        selection
    }

    /// Select `artifact` with `technology`, replacing any earlier choice.
    /// Choosing `None` removes the artifact instead.
    pub fn choose(&mut self, artifact: &Artifact, technology: &str) {
        let technology = technology.trim();
        if technology.eq_ignore_ascii_case(EXCLUDE_CHOICE) {
            self.entries.shift_remove(&artifact.name);
            return;
        }
        self.entries.insert(
            artifact.name.clone(),
            SelectedArtifact {
                artifact: artifact.clone(),
                technology: technology.to_string(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&SelectedArtifact> {
        self.entries.get(name)
    }

    /// Keep only artifacts whose file name matches at least one pattern.
    /// An empty pattern list keeps everything.
    pub fn retain_matching(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }
        self.entries
            .retain(|name, _| patterns.iter().any(|p| p.matches(name)));
    }

    /// Drop artifacts whose file name matches any pattern.
    pub fn exclude_matching(&mut self, patterns: &[Pattern]) {
        self.entries
            .retain(|name, _| !patterns.iter().any(|p| p.matches(name)));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedArtifact> {
        self.entries.values()
    }

    /// Fail if there is nothing to install.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SbiError::EmptySelection);
        }
        Ok(())
    }

    /// Remove and return every entry in selection order, leaving the selection empty.
    pub fn take(&mut self) -> Vec<SelectedArtifact> {
        self.entries.drain(..).map(|(_, entry)| entry).collect()
    }
}

/// Compile user-supplied file name globs.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| SbiError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
