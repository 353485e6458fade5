// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::Path;

use anyhow::{Context, Result};
use keyper_config::KeyperConfig;
use keyper_data::Repositories;
use keyper_keyshare::{DkgResultRecord, KeyperDb};
use keyper_shcrypto::PureDkgResult;
use tracing::info;

use crate::helpers::datastore::{setup_datastore, shutdown};

pub async fn execute(config: &KeyperConfig, file: &Path, failed: bool) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let result: PureDkgResult = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a DKG result", file.display()))?;
    result.validate()?;

    let record = DkgResultRecord {
        success: !failed,
        pure_result: result.encode()?,
    };

    let store = setup_datastore(config)?;
    let repositories = Repositories::new(store.clone());
    repositories.insert_dkg_result(result.eon, &record).await?;
    shutdown(&store).await?;

    info!(
        eon = result.eon,
        keyper_index = result.keyper,
        success = record.success,
        "imported DKG result"
    );
    println!(
        "stored DKG result for eon {} (keyper {} of {}, threshold {})",
        result.eon, result.keyper, result.num_keypers, result.threshold
    );
    Ok(())
}
