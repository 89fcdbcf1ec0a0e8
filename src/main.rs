use anyhow::Result;
use clap::Parser;
use sbi::commands::{Config, InstallOptions};
use sbi::runtime::RealRuntime;
use sbi::technology::FlagTable;
use std::path::PathBuf;

/// sbi - silent batch installer
///
/// Finds installer executables in a directory (and its immediate
/// subdirectories), picks the silent-install flags for each one and runs
/// them one after another.
///
/// The default installer type of each file comes from a hint file of
/// `keyword=type` lines; the first keyword contained in the file name wins.
///
/// Examples:
///   sbi list                              # Show installers and their default type
///   sbi install -y                        # Install everything silently
///   sbi install --as tool.exe="Inno setup" --exclude "*-beta*"
#[derive(Parser, Debug)]
#[command(author, version = env!("SBI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing the installers (default: ./exefile; also via SBI_ROOT)
    #[arg(long = "root", short = 'r', env = "SBI_ROOT", value_name = "PATH", global = true)]
    pub root: Option<PathBuf>,

    /// Type hint file (default: ./options.txt; also via SBI_HINTS)
    #[arg(long = "hints", env = "SBI_HINTS", value_name = "FILE", global = true)]
    pub hints: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List installers with their default type and silent flags
    List(ListArgs),

    /// Install the selected installers
    Install(InstallArgs),

    /// Show the silent-install flags for each installer type
    Flags,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Only install files matching this glob (repeatable)
    #[arg(long = "only", value_name = "GLOB")]
    pub only: Vec<String>,

    /// Skip files matching this glob (repeatable)
    #[arg(long = "exclude", short = 'x', value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Override the installer type of a file; "None" skips it (repeatable)
    #[arg(long = "as", value_name = "FILE=TYPE")]
    pub overrides: Vec<String>,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the commands without running them
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<InstallArgs> for InstallOptions {
    fn from(args: InstallArgs) -> Self {
        InstallOptions {
            only: args.only,
            exclude: args.exclude,
            overrides: args.overrides,
            yes: args.yes,
            dry_run: args.dry_run,
            json: args.json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List(args) => {
            let config = Config::new(RealRuntime::new(), cli.root, cli.hints)?;
            sbi::commands::list(config, args.json)?
        }
        Commands::Install(args) => {
            let config = Config::new(RealRuntime::new(), cli.root, cli.hints)?;
            sbi::commands::install(config, args.into())?
        }
        Commands::Flags => sbi::commands::flags(&FlagTable::builtin())?,
    }
    Ok(())
}
