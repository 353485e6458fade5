// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use keyper_config::KeyperConfig;

pub fn execute() -> Result<()> {
    print!("{}", KeyperConfig::default().to_yaml()?);
    Ok(())
}
