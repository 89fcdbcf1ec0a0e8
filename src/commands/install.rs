use anyhow::{Context, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::io::{self, Write};

use crate::artifact::{Artifact, discover_artifacts};
use crate::engine::{BatchEvent, Engine, spawn_batch};
use crate::hints::TypeHints;
use crate::outcome::Outcome;
use crate::runtime::Runtime;
use crate::selection::{Selection, compile_patterns};

use super::config::Config;

/// How the user narrowed and adjusted the default selection.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Globs a file name must match to be installed (any of them)
    pub only: Vec<String>,
    /// Globs excluding file names from the batch
    pub exclude: Vec<String>,
    /// `<file>=<technology>` overrides; technology `None` excludes the file
    pub overrides: Vec<String>,
    /// Skip the confirmation prompt
    pub yes: bool,
    /// Print commands instead of running them
    pub dry_run: bool,
    /// Print results as JSON
    pub json: bool,
}

fn parse_override(spec: &str) -> Result<(&str, &str)> {
    spec.split_once('=')
        .map(|(file, tech)| (file.trim(), tech.trim()))
        .filter(|(file, tech)| !file.is_empty() && !tech.is_empty())
        .with_context(|| format!("Invalid override '{}', expected <FILE>=<TECHNOLOGY>", spec))
}

/// Start from every artifact with its hinted technology, then apply the
/// include/exclude globs and the per-file overrides.
#[tracing::instrument(skip(artifacts, hints))]
pub fn build_selection(
    artifacts: &[Artifact],
    hints: &TypeHints,
    options: &InstallOptions,
) -> Result<Selection> {
    let mut selection = Selection::from_defaults(artifacts, hints);
    selection.retain_matching(&compile_patterns(&options.only)?);
    selection.exclude_matching(&compile_patterns(&options.exclude)?);

    for spec in &options.overrides {
        let (file, technology) = parse_override(spec)?;
        let artifact = artifacts
            .iter()
            .find(|a| a.name == file)
            .with_context(|| format!("No installer named '{}'", file))?;
        debug!("Override: {} -> {}", file, technology);
        selection.choose(artifact, technology);
    }

    Ok(selection)
}

#[derive(Serialize)]
struct OutcomeReport<'a> {
    file: &'a str,
    message: String,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

pub(crate) fn write_outcomes<W: Write>(
    out: &mut W,
    outcomes: &IndexMap<String, Outcome>,
    json: bool,
) -> Result<()> {
    if json {
        let reports: Vec<OutcomeReport> = outcomes
            .iter()
            .map(|(file, outcome)| OutcomeReport {
                file,
                message: outcome.message(),
                outcome,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
        return Ok(());
    }

    for (file, outcome) in outcomes {
        writeln!(out, "{}: {}", file, outcome)?;
    }
    Ok(())
}

/// Install the selected installers and report one result per file
#[tracing::instrument(skip(config, options))]
pub fn install<R: Runtime + 'static>(config: Config<R>, options: InstallOptions) -> Result<()> {
    let artifacts = discover_artifacts(&config.runtime, &config.root)?;
    debug!("Discovered {} installer(s)", artifacts.len());

    let selection = build_selection(&artifacts, &config.hints, &options)?;
    selection.validate()?;

    let names: Vec<&str> = selection.names().collect();
    if !options.json {
        println!("Selected files and options: {}", names.join(", "));
    }

    let engine = Engine::new(config.runtime, config.root, config.flags);

    if options.dry_run {
        for entry in selection.iter() {
            match engine.command_for(entry) {
                Ok(command) => println!("{}", command),
                Err(e) => println!("{}: skipped, {}", entry.artifact.name, e),
            }
        }
        return Ok(());
    }

    if !options.yes
        && !engine
            .runtime()
            .confirm(&format!("Install {} file(s)?", selection.len()))?
    {
        println!("Installation cancelled.");
        return Ok(());
    }

    if !engine.runtime().is_privileged() {
        warn!("Not running with administrator privileges, installers may prompt or fail");
    }

    let handle = spawn_batch(engine, selection);
    for event in handle.events.iter() {
        match event {
            BatchEvent::Started { artifact, command } => {
                debug!("Running {}", command);
                if !options.json {
                    println!("  installing {}", artifact);
                }
            }
            BatchEvent::Finished { artifact, outcome } => {
                debug!("Finished {}: {}", artifact, outcome);
            }
            BatchEvent::Done => break,
        }
    }
    let engine = handle.join()?;

    let outcomes = engine.outcomes();
    write_outcomes(&mut io::stdout().lock(), outcomes, options.json)?;

    let failed = outcomes.values().filter(|o| o.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} installation(s) failed", failed, outcomes.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SbiError;
    use crate::outcome::PathStatus;
    use crate::runtime::MockRuntime;
    use crate::technology::FlagTable;
    use crate::test_utils::test_root;

    fn artifacts() -> Vec<Artifact> {
        vec![
            Artifact::new("ni-visa.exe"),
            Artifact::new("setup-msi.exe"),
            Artifact::new("tool.exe"),
        ]
    }

    fn hints() -> TypeHints {
        "msi=Microsoft Windows Installer\nvisa=Ni-VISA".parse().unwrap()
    }

    fn config(runtime: MockRuntime) -> Config<MockRuntime> {
        Config {
            runtime,
            root: test_root(),
            hints: hints(),
            flags: FlagTable::builtin(),
        }
    }

    #[test]
    fn test_build_selection_defaults_select_everything() {
        let selection = build_selection(&artifacts(), &hints(), &InstallOptions::default()).unwrap();
        assert_eq!(selection.len(), 3);
        assert_eq!(
            selection.get("setup-msi.exe").unwrap().technology,
            "Microsoft Windows Installer"
        );
    }

    #[test]
    fn test_build_selection_filters_and_overrides() {
        let options = InstallOptions {
            only: vec!["*.exe".into()],
            exclude: vec!["ni-*".into()],
            overrides: vec!["tool.exe = Inno setup".into(), "setup-msi.exe=None".into()],
            ..Default::default()
        };
        let selection = build_selection(&artifacts(), &hints(), &options).unwrap();
        let names: Vec<&str> = selection.names().collect();
        assert_eq!(names, vec!["tool.exe"]);
        assert_eq!(selection.get("tool.exe").unwrap().technology, "Inno setup");
    }

    #[test]
    fn test_override_can_bring_back_excluded_file() {
        let options = InstallOptions {
            exclude: vec!["*".into()],
            overrides: vec!["ni-visa.exe=visa".into()],
            ..Default::default()
        };
        let selection = build_selection(&artifacts(), &hints(), &options).unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.get("ni-visa.exe").unwrap().technology, "visa");
    }

    #[test]
    fn test_override_for_unknown_file_fails() {
        let options = InstallOptions {
            overrides: vec!["missing.exe=msi".into()],
            ..Default::default()
        };
        assert!(build_selection(&artifacts(), &hints(), &options).is_err());
    }

    #[test]
    fn test_malformed_override_fails() {
        for spec in ["tool.exe", "=msi", "tool.exe="] {
            let options = InstallOptions {
                overrides: vec![spec.into()],
                ..Default::default()
            };
            assert!(
                build_selection(&artifacts(), &hints(), &options).is_err(),
                "'{}' should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_unknown_technology_override_is_kept_for_engine() {
        let options = InstallOptions {
            overrides: vec!["tool.exe=WiX".into()],
            ..Default::default()
        };
        let selection = build_selection(&artifacts(), &hints(), &options).unwrap();
        assert_eq!(selection.get("tool.exe").unwrap().technology, "WiX");
    }

    #[test]
    fn test_install_empty_selection_spawns_nothing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_run_shell().never();
        runtime.expect_confirm().never();

        let err = install(config(runtime), InstallOptions::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SbiError>(),
            Some(&SbiError::EmptySelection)
        );
    }

    #[test]
    fn test_install_declined_confirmation_spawns_nothing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .returning(|p| Ok(vec![p.join("tool.exe")]));
        runtime.expect_is_dir().returning(|_| false);
        runtime.expect_confirm().times(1).returning(|_| Ok(false));
        runtime.expect_run_shell().never();

        install(config(runtime), InstallOptions::default()).unwrap();
    }

    #[test]
    fn test_install_dry_run_spawns_nothing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .returning(|p| Ok(vec![p.join("tool.exe")]));
        runtime.expect_is_dir().returning(|_| false);
        runtime.expect_confirm().never();
        runtime.expect_run_shell().never();

        let options = InstallOptions {
            dry_run: true,
            ..Default::default()
        };
        install(config(runtime), options).unwrap();
    }

    #[test]
    fn test_install_reports_failures() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_dir()
            .returning(|p| Ok(vec![p.join("setup-msi.exe"), p.join("tool.exe")]));
        runtime.expect_is_dir().returning(|_| false);
        runtime.expect_is_privileged().returning(|| true);
        runtime
            .expect_run_shell()
            .returning(|cmd| Ok(Some(if cmd.contains("tool.exe") { 1 } else { 0 })));

        let options = InstallOptions {
            yes: true,
            ..Default::default()
        };
        let err = install(config(runtime), options).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 installation(s) failed");
    }

    #[test]
    fn test_write_outcomes_text_and_json() {
        let mut outcomes = IndexMap::new();
        outcomes.insert("setup-msi.exe".to_string(), Outcome::Succeeded);
        outcomes.insert(
            "pyth-3.11.exe".to_string(),
            Outcome::Runtime {
                path: PathStatus::AlreadyOnPath,
            },
        );

        let mut out = Vec::new();
        write_outcomes(&mut out, &outcomes, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "setup-msi.exe: Installation successful\n\
             pyth-3.11.exe: Installation successful. 'python' is included in the PATH\n"
        );

        let mut out = Vec::new();
        write_outcomes(&mut out, &outcomes, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["file"], "setup-msi.exe");
        assert_eq!(value[0]["status"], "succeeded");
        assert_eq!(value[1]["status"], "runtime");
        assert_eq!(value[1]["path"]["path_status"], "already_on_path");
    }
}
