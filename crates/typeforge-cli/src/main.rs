use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "typeforge")]
#[command(
    about = "Transform schema definitions and lay them out as a tree of type files",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled pass and assemble the file tree
    Generate {
        /// Definition set (JSON format)
        #[arg(short, long)]
        input: PathBuf,

        /// Generator config (TOML); defaults to typeforge.toml beside the input
        #[arg(short, long, env = "TYPEFORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Output file for the tree; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run everything without writing, then print statistics
    Check {
        /// Definition set (JSON format)
        #[arg(short, long)]
        input: PathBuf,

        /// Generator config (TOML); defaults to typeforge.toml beside the input
        #[arg(short, long, env = "TYPEFORGE_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags
    let level = if cli.debug {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.debug) // Show target module in debug mode
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Generate {
            input,
            config,
            output,
        } => handle_generate(input, config, output),
        Commands::Check { input, config } => handle_check(input, config),
    }
}

fn handle_generate(input: PathBuf, config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    info!("Generating from {:?}", input);
    let generated = typeforge::generate(&input, config.as_deref())?;
    if let Some(json) = typeforge::write_output(&generated, output.as_deref())? {
        println!("{}", json);
    }
    Ok(())
}

fn handle_check(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let generated = typeforge::generate(&input, config.as_deref())?;
    println!("{}", typeforge::summarize(&generated));
    Ok(())
}
