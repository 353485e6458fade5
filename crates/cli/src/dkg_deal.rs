// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use keyper_shcrypto::deal;
use rand::rngs::OsRng;

pub fn execute(eon: u64, num_keypers: u64, threshold: u64, out_dir: &Path) -> Result<()> {
    let results = deal(eon, num_keypers, threshold, &mut OsRng)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Could not create {}", out_dir.display()))?;

    for result in results {
        let path = out_dir.join(format!("dkg-{}-{}.json", eon, result.keyper));
        fs::write(&path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("Could not write {}", path.display()))?;
        println!("{}", path.display());
    }
    Ok(())
}
