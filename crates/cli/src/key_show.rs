// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use keyper_config::KeyperConfig;
use keyper_data::Repositories;
use keyper_events::EpochId;
use keyper_keyshare::KeyperDb;
use keyper_utils::to_hex;

use crate::helpers::datastore::{setup_datastore, shutdown};

pub async fn execute(config: &KeyperConfig, eon: u64, epoch: &str) -> Result<()> {
    let epoch = EpochId::from_hex(epoch)?;
    let store = setup_datastore(config)?;
    let key = Repositories::new(store.clone()).get_key(eon, &epoch).await;
    shutdown(&store).await?;

    let Some(key) = key? else {
        bail!("no decryption key stored for eon {eon} epoch {epoch}");
    };
    println!("{}", to_hex(&key));
    Ok(())
}
