// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use clap::Parser;
use cli::Cli;

mod cli;
mod dkg;
mod dkg_deal;
mod dkg_import;
mod generate_config;
mod helpers;
mod init_db;
mod key;
mod key_show;
mod submit;

#[actix::main]
pub async fn main() {
    if let Err(err) = Cli::parse().execute().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
