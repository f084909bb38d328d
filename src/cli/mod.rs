use biomint::config::{default_config_path, BiomintConfig, LoggingConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub mod bridge;
pub mod connect;
pub mod init;
pub mod output;
pub mod retrieve;
pub mod sample;
pub mod store;
pub mod version;

#[derive(Parser)]
#[command(name = "biomint")]
#[command(author = "biomint contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wallet sessions, content uploads and local bridge streams", long_about = None)]
pub struct Cli {
    /// Path to config file (default: <config dir>/biomint/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Open a wallet session and print the account handle
    Connect {
        /// Chain to connect (near, solana, filecoin, polkadot)
        chain: String,
    },

    /// Upload a file (or stdin with "-") and print its locator
    Store {
        /// File to upload, or "-" for stdin
        input: String,

        /// Require the input to be valid JSON
        #[arg(long)]
        json: bool,
    },

    /// Download content by CID
    Retrieve {
        /// Content identifier as printed by `store`
        cid: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Record a stream from one chain to another
    Bridge {
        /// Source chain
        #[arg(long)]
        from: String,

        /// Target chain
        #[arg(long)]
        to: String,

        /// Payload file
        #[arg(long, conflicts_with = "samples")]
        file: Option<PathBuf>,

        /// Use this many generated biometric samples as the payload
        #[arg(long)]
        samples: Option<usize>,

        /// Metadata entry (key=value); may be repeated
        #[arg(long = "meta")]
        meta: Vec<String>,

        /// Use mock wallet sessions instead of RPC
        #[arg(long)]
        offline: bool,
    },

    /// Print generated biometric samples as JSON
    Sample {
        /// Number of samples
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Display version information
    Version,
}

/// Load the config at `path` (defaults if absent) and apply env overrides.
fn load_config(path: &Path) -> Result<BiomintConfig, Box<dyn std::error::Error>> {
    let mut config = BiomintConfig::load_or_default(path)?;
    config.apply_env();
    Ok(config)
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("biomint={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.unwrap_or_else(default_config_path);

    // `init` must work even when the existing file no longer parses.
    if let Commands::Init { force } = cli.command {
        init_tracing(&LoggingConfig::default().level);
        return init::execute(&config_path, force);
    }

    let config = load_config(&config_path)?;
    init_tracing(&config.logging.level);

    match cli.command {
        Commands::Init { force } => init::execute(&config_path, force),
        Commands::Connect { chain } => connect::execute(&config, &chain).await,
        Commands::Store { input, json } => store::execute(&config, &input, json).await,
        Commands::Retrieve { cid, output } => retrieve::execute(&config, &cid, output).await,
        Commands::Bridge {
            from,
            to,
            file,
            samples,
            meta,
            offline,
        } => {
            let args = bridge::BridgeArgs {
                from,
                to,
                file,
                samples,
                meta,
                offline,
            };
            bridge::execute(&config, args).await
        }
        Commands::Sample { count, seed } => sample::execute(count, seed),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
