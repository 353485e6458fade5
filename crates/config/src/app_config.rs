// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use keyper_events::InstanceId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::load_config::{find_in_parent, resolve_config_path};

pub const DEFAULT_CONFIG_NAME: &str = "keyper.config.yaml";
pub const ENV_PREFIX: &str = "KEYPER_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Sled,
    InMem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyperConfig {
    /// Node name, used for the default data directory
    pub name: String,
    /// Network instance this keyper belongs to. Messages for other instances are rejected.
    pub instance_id: InstanceId,
    pub data_dir: PathBuf,
    /// Relative paths resolve against `data_dir`
    pub db_file: PathBuf,
    pub store: StoreKind,
}

impl Default for KeyperConfig {
    fn default() -> Self {
        let name = String::from("_default");
        Self {
            data_dir: OsDirs::data_dir().join(&name),
            name,
            instance_id: 0,
            db_file: PathBuf::from("db"),
            store: StoreKind::default(),
        }
    }
}

impl KeyperConfig {
    pub fn db_path(&self) -> PathBuf {
        if self.db_file.is_absolute() {
            return self.db_file.clone();
        }
        self.data_dir.join(&self.db_file)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Could not serialize configuration")
    }
}

/// Defaults, then the YAML file, then `KEYPER_*` environment variables.
///
/// A missing file is only an error when it was asked for explicitly.
pub fn load_config(cli_file: Option<&Path>) -> Result<KeyperConfig> {
    let cwd = env::current_dir()?;
    let path = resolve_config_path(
        find_in_parent,
        &cwd,
        &OsDirs::config_dir(),
        DEFAULT_CONFIG_NAME,
        cli_file,
    );

    let mut figment = Figment::from(Serialized::defaults(KeyperConfig::default()));
    if path.exists() {
        debug!("loading configuration from {:?}", path);
        figment = figment.merge(Yaml::file(&path));
    } else if cli_file.is_some() {
        return Err(anyhow!(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("configuration file {} not found", path.display()),
        )));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Could not parse configuration")
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyper")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyper")
    }
}
