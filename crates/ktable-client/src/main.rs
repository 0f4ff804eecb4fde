//! `ktable`: diagnostic CLI for KinectTable connections.
//!
//! Connects once with the requested strategy, reports the resulting client,
//! and disconnects.  Useful for checking that a camera or remote host is
//! reachable before starting a full application.
//!
//! # Usage
//!
//! ```text
//! ktable [--config <PATH>] <COMMAND>
//!
//! Commands:
//!   local  [--endpoint <NAME>] [--data-types <BITS>] [--max-fps <N>]
//!   remote <ADDR>             [--data-types <BITS>] [--max-fps <N>]
//!   tweak  [VALUE]            Show the depth tweak, or check a set/read round trip
//!   config [--write]          Print (and optionally save) the effective config
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable        | Description                                   |
//! |-----------------|-----------------------------------------------|
//! | `KTABLE_CONFIG` | Config file path (same as `--config`)         |
//! | `RUST_LOG`      | `tracing` filter; overrides `[logging] level` |

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ktable_client::infrastructure::{
    build_factory,
    storage::config::{config_file_path, load_config_from, save_config_to, CONFIG_ENV_VAR},
};
use ktable_core::{depth_tweak, set_depth_tweak, DataTypes, SessionParameters};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// KinectTable connection diagnostics.
#[derive(Debug, Parser)]
#[command(name = "ktable", about = "KinectTable connection diagnostics", version)]
struct Cli {
    /// Config file to read instead of the platform default.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attach to a locally connected camera, then release it.
    Local {
        /// Device endpoint; omit to use the configured default.
        #[arg(long)]
        endpoint: Option<String>,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Open a session to a remote table host, then close it.
    Remote {
        /// `host:port`, `host`, or `[ipv6]:port`.
        address: String,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print the startup depth tweak; with VALUE, set it and print the value
    /// read back.
    ///
    /// The tweak lives only in this process and is never saved, so this is a
    /// check of the set/read path rather than a way to change later runs.
    Tweak {
        #[arg(allow_negative_numbers = true)]
        value: Option<i32>,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Also write it to the config file.
        #[arg(long)]
        write: bool,
    },
}

/// Session parameters shared by the connect commands.
#[derive(Debug, Args)]
struct SessionArgs {
    /// Bitmask of requested streams (1 = depth, 2 = color, 4 = hands, 8 = blobs).
    #[arg(long, default_value_t = DataTypes::ALL)]
    data_types: u32,

    /// Frame-rate cap; 0 means the device's native rate.
    #[arg(long, default_value_t = 0)]
    max_fps: u32,
}

impl SessionArgs {
    fn to_params(&self) -> SessionParameters {
        SessionParameters::new(self.data_types).with_max_fps(self.max_fps)
    }
}

/// Sets the depth tweak when `value` is given, then reads it back.
fn tweak_round_trip(value: Option<i32>) -> i32 {
    if let Some(v) = value {
        set_depth_tweak(v);
        info!(value = v, "depth tweak set for this process only");
    }
    depth_tweak()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config_file_path().context("resolving config file path")?,
    };
    let config = load_config_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let factory = build_factory(&config);

    match cli.command {
        Command::Local { endpoint, session } => {
            let params = session.to_params();
            let client = match endpoint.as_deref() {
                Some(name) => factory.connect_local_at(&params, name),
                None => factory.connect_local(&params),
            }
            .context("local connect failed")?;
            info!(client_id = %client.id(), address = %client.address(), "local client ready");
            client.disconnect();
        }
        Command::Remote { address, session } => {
            let client = factory
                .connect_remote(&session.to_params(), &address)
                .with_context(|| format!("remote connect to {address} failed"))?;
            info!(client_id = %client.id(), address = %client.address(), "remote client ready");
            client.disconnect();
        }
        Command::Tweak { value } => {
            println!("{}", tweak_round_trip(value));
        }
        Command::Config { write } => {
            print!("{}", toml::to_string_pretty(&config)?);
            if write {
                save_config_to(&config_path, &config)
                    .with_context(|| format!("writing {}", config_path.display()))?;
                info!(path = %config_path.display(), "config written");
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
