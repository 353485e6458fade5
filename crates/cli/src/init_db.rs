// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use keyper_config::{KeyperConfig, StoreKind};

use crate::helpers::datastore::{get_sled_store, shutdown};

pub async fn execute(config: &KeyperConfig) -> Result<()> {
    if config.store != StoreKind::Sled {
        bail!("init-db only applies to the sled store");
    }
    let path = config.db_path();
    let existed = path.exists();
    let store = get_sled_store(&path)?;
    shutdown(&store).await?;

    if existed {
        println!("recovered database at {}", path.display());
    } else {
        println!("created database at {}", path.display());
    }
    Ok(())
}
