// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use clap::Subcommand;
use keyper_config::KeyperConfig;

use crate::key_show;

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Print the stored decryption key for an epoch
    Show {
        #[arg(long)]
        eon: u64,

        /// Hex encoded 32 byte epoch id
        #[arg(long)]
        epoch: String,
    },
}

pub async fn execute(command: KeyCommands, config: &KeyperConfig) -> Result<()> {
    match command {
        KeyCommands::Show { eon, epoch } => key_show::execute(config, eon, &epoch).await?,
    };

    Ok(())
}
