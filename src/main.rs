use anyhow::Result;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Parser;
use kjspkg::cleanup::StagingGuard;
use kjspkg::commands::{self, BatchOptions, InitOptions, config::Config};
use kjspkg::error::KjspkgError;
use std::path::PathBuf;

/// kjspkg - package manager for KubeJS scripts
///
/// Installs community script and asset packages into the kubejs directory of
/// a modpack and keeps track of them in a `.kjspkg` file.
///
/// Examples:
///   kjspkg init --version 1.19 --modloader forge
///   kjspkg install somepackage
#[derive(Parser, Debug)]
#[command(author, version = env!("KJSPKG_VERSION"), about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root, the kubejs directory (defaults to the current directory; also via KJSPKG_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "KJSPKG_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Base URL of the package catalog
    #[arg(
        long = "registry-url",
        env = "KJSPKG_REGISTRY_URL",
        value_name = "URL",
        global = true
    )]
    pub registry_url: Option<String>,

    /// Host that package repositories are cloned from (defaults to https://github.com)
    #[arg(
        long = "git-host",
        env = "KJSPKG_GIT_HOST",
        value_name = "URL",
        global = true
    )]
    pub git_host: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install packages
    Install(BatchArgs),

    /// Remove installed packages
    #[command(visible_alias = "uninstall")]
    Remove(BatchArgs),

    /// List installed packages
    List {
        /// Only print how many packages are installed
        #[arg(long)]
        count: bool,
    },

    /// Create a project in the kubejs directory
    Init(InitArgs),

    /// Remove all packages and the project
    Uninit {
        /// Do not ask for confirmation
        #[arg(long)]
        confirm: bool,
    },

    /// Show the list of commands
    #[command(visible_alias = "help")]
    Info,
}

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// Package names
    #[arg(value_name = "PACKAGE", required = true)]
    pub names: Vec<String>,

    /// Do not print a line per package
    #[arg(long)]
    pub quiet: bool,

    /// Skip packages that do not exist or are not installed instead of failing
    #[arg(long = "skip-missing", visible_alias = "skipmissing")]
    pub skip_missing: bool,
}

impl From<&BatchArgs> for BatchOptions {
    fn from(args: &BatchArgs) -> Self {
        BatchOptions {
            quiet: args.quiet,
            skip_missing: args.skip_missing,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Minecraft version, e.g. 1.19.2
    #[arg(long = "version", value_name = "VERSION")]
    pub mc_version: Option<String>,

    /// forge, fabric or quilt
    #[arg(long, value_name = "MODLOADER")]
    pub modloader: Option<String>,

    /// Do not print anything and keep an existing project
    #[arg(long)]
    pub quiet: bool,

    /// Replace an existing project without asking
    #[arg(long = "override")]
    pub override_existing: bool,
}

/// Parse arguments, turning an unknown subcommand into a regular error.
fn parse_cli() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            let name = match e.get(ContextKind::InvalidSubcommand) {
                Some(ContextValue::String(name)) => name.clone(),
                _ => String::new(),
            };
            Err(KjspkgError::UnknownCommand(name).into())
        }
        Err(e) => e.exit(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = parse_cli()?;
    let runtime = kjspkg::runtime::RealRuntime;

    let Some(command) = cli.command else {
        commands::info();
        return Ok(());
    };

    let config = Config::new(&runtime, cli.root, cli.registry_url, cli.git_host)?;
    let _staging = StagingGuard::new(config.layout().staging_root());

    match command {
        Commands::Install(args) => {
            let registry = config.registry()?;
            let fetcher = config.fetcher();
            commands::install(
                &runtime,
                &registry,
                &fetcher,
                &config,
                &args.names,
                &(&args).into(),
            )
            .await?
        }
        Commands::Remove(args) => {
            commands::remove(&runtime, &config, &args.names, &(&args).into())?
        }
        Commands::List { count } => commands::list(&runtime, &config, count)?,
        Commands::Init(args) => {
            let options = InitOptions {
                version: args.mc_version,
                modloader: args.modloader,
                quiet: args.quiet,
                override_existing: args.override_existing,
            };
            commands::init(&runtime, &config, &options)?;
        }
        Commands::Uninit { confirm } => commands::uninit(&runtime, &config, confirm)?,
        Commands::Info => commands::info(),
    }
    Ok(())
}
