// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use crate::dkg::{self, DkgCommands};
use crate::helpers::datastore::close_all_connections;
use crate::helpers::telemetry::setup_tracing;
use crate::key::{self, KeyCommands};
use crate::{generate_config, init_db, submit};
use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use keyper_config::{load_config, KeyperConfig};
use tracing::{debug, instrument, Level};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "keyper")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Aggregates threshold decryption key shares into epoch decryption keys", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `keyper -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_tracing(self.log_level());

        if let Commands::GenerateConfig = self.command {
            return generate_config::execute();
        }

        let config = self.load_config()?;
        debug!(name = %config.name, instance_id = config.instance_id, "config loaded");

        let result = match self.command {
            Commands::InitDb => init_db::execute(&config).await,
            Commands::GenerateConfig => Ok(()),
            Commands::Dkg { command } => dkg::execute(command, &config).await,
            Commands::Submit { file } => submit::execute(&config, &file).await,
            Commands::Key { command } => key::execute(command, &config).await,
        };

        close_all_connections();

        result
    }

    pub fn load_config(&self) -> Result<KeyperConfig> {
        load_config(self.config.as_deref())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database, or report that an existing one was recovered
    InitDb,

    /// Print the default configuration as YAML
    GenerateConfig,

    /// DKG result management
    Dkg {
        #[command(subcommand)]
        command: DkgCommands,
    },

    /// Run a JSON encoded p2p message through validation and handling, printing any outgoing
    /// messages
    Submit {
        /// Path to the message file
        file: PathBuf,
    },

    /// Decryption key lookup
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}
