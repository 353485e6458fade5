// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use keyper_config::KeyperConfig;
use keyper_data::Repositories;
use keyper_events::P2PMessage;
use keyper_keyshare::MessageRouter;

use crate::helpers::datastore::{setup_datastore, shutdown};

pub async fn execute(config: &KeyperConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let msg: P2PMessage = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a p2p message", file.display()))?;

    let store = setup_datastore(config)?;
    let router = MessageRouter::keyper(
        config.instance_id,
        Arc::new(Repositories::new(store.clone())),
    );
    let outcome = router.deliver(&msg).await;
    shutdown(&store).await?;

    for out in outcome? {
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
