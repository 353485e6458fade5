// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;
use keyper_config::KeyperConfig;

use crate::{dkg_deal, dkg_import};

#[derive(Subcommand, Debug)]
pub enum DkgCommands {
    /// Store a JSON encoded DKG result for its eon
    Import {
        /// Path to the DKG result file
        file: PathBuf,

        /// Record the eon's DKG as failed. Shares for the eon will be rejected.
        #[arg(long)]
        failed: bool,
    },

    /// Deal DKG results for every keyper of a devnet eon from one random polynomial
    Deal {
        #[arg(long)]
        eon: u64,

        /// Number of keypers
        #[arg(long = "keypers", short = 'n')]
        num_keypers: u64,

        #[arg(long, short = 't')]
        threshold: u64,

        /// Directory the per keyper result files are written to
        #[arg(long = "out-dir", default_value = ".")]
        out_dir: PathBuf,
    },
}

pub async fn execute(command: DkgCommands, config: &KeyperConfig) -> Result<()> {
    match command {
        DkgCommands::Import { file, failed } => dkg_import::execute(config, &file, failed).await?,
        DkgCommands::Deal {
            eon,
            num_keypers,
            threshold,
            out_dir,
        } => dkg_deal::execute(eon, num_keypers, threshold, &out_dir)?,
    };

    Ok(())
}
