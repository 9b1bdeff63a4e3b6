// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hwtopo CLI entrypoint.
//!
//! Developer-facing commands for topologies built from the stock catalog.
//!
//! # Usage
//! ```text
//! hwtopo [--config-dir DIR] [-v] <command> [options]
//! ```
//!
//! The CLI exits with code `0` on success and non-zero on error. Logs go to
//! stderr so stdout stays pipeable.

// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use hwtopo_core::Capability;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(name = "hwtopo", author, version, about, long_about = None)]
struct Args {
    /// Directory holding stored topologies (defaults to the platform config dir)
    #[clap(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Command to execute
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered discriminators per capability
    Types {
        /// Only list this capability
        #[clap(long, value_enum)]
        capability: Option<CapabilityArg>,
    },
    /// Print the sample topology, or store it under KEY
    Sample {
        /// Store under this key instead of printing
        #[clap(long, value_name = "KEY")]
        save: Option<String>,
    },
    /// Print a stored topology
    Show {
        /// Key the topology is stored under
        key: String,
    },
    /// Decode a topology file, restore back-references and verify them
    Check {
        /// Topology JSON file
        file: PathBuf,
    },
    /// Re-encode a topology file canonically
    Fmt {
        /// Topology JSON file
        file: PathBuf,
        /// Rewrite the file in place instead of printing
        #[clap(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CapabilityArg {
    Board,
    Extension,
    I2c,
    Uart,
    Spi,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::Board => Self::Board,
            CapabilityArg::Extension => Self::Extension,
            CapabilityArg::I2c => Self::I2c,
            CapabilityArg::Uart => Self::Uart,
            CapabilityArg::Spi => Self::Spi,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let codec = commands::codec()?;
    match args.cmd {
        Command::Types { capability } => commands::types(&codec, capability.map(Into::into)),
        Command::Sample { save } => match save {
            Some(key) => commands::save_sample(&codec, args.config_dir.as_deref(), &key),
            None => commands::print_sample(&codec),
        },
        Command::Show { key } => commands::show(&codec, args.config_dir.as_deref(), &key),
        Command::Check { file } => commands::check(&codec, &file),
        Command::Fmt { file, write } => commands::fmt(&codec, &file, write),
    }
}
