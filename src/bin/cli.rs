use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigmaindex::config::{Config, ConfigOverrides, DEFAULT_CONFIG_FILE};
use sigmaindex::error::IndexError;
use sigmaindex::IndexOptions;

#[derive(Parser)]
#[command(
    name = "sigma-index",
    about = "Build a static Sigma rule index",
    version,
    author,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    build: BuildArgs,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Path to the local sigma repo
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output JSON file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory names to exclude (repeatable, added to the defaults)
    #[arg(long, value_name = "NAME")]
    exclude: Vec<String>,

    /// Config file path
    #[arg(long, short = 'c', env = "SIGMA_INDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Follow symbolic links while walking the source tree
    #[arg(long)]
    follow_links: bool,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log skipped files and scan progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a starter .sigma-index.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.build.verbose);

    let result = match cli.command {
        Some(Commands::Init { force }) => cmd_init(force),
        None => cmd_build(cli.build),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_build(args: BuildArgs) -> Result<i32, IndexError> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = Config::load(&config_path)?;

    config.apply_overrides(ConfigOverrides {
        source: args.source,
        output: args.output,
        exclude: args.exclude,
        follow_links: args.follow_links,
        pretty: args.pretty,
    });

    let options = IndexOptions::from_config(&config)?;
    let index = sigmaindex::build_index(&options)?;
    let written = sigmaindex::write_index(&index, &options)?;

    println!("Wrote {} rules to {}", index.count(), written.display());
    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, IndexError> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);

    if path.exists() && !force {
        eprintln!("{} already exists. Use --force to overwrite.", DEFAULT_CONFIG_FILE);
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created {}", DEFAULT_CONFIG_FILE);

    Ok(0)
}
