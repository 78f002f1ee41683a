// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Layered settings: defaults, then `config.toml` (platform config dir or `--config`),
//! then `DUALLEDGER_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Weekday;
use serde::Deserialize;

use crate::errors::{Error, Result};
use crate::rates::RateEndpoints;

const ENV_PREFIX: &str = "DUALLEDGER";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub rate_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub week_start: String,
    pub direct_rate_url: String,
    pub base_rate_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let endpoints = RateEndpoints::default();
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            rate_refresh_secs: 300,
            request_timeout_secs: 10,
            week_start: "sunday".to_string(),
            direct_rate_url: endpoints.direct,
            base_rate_url: endpoints.base_rates,
        }
    }
}

impl AppConfig {
    /// `path` overrides the default location; the default file may be absent, an
    /// explicit one may not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        match path {
            Some(p) => {
                builder = builder.add_source(config::File::from(p).required(true));
            }
            None => {
                if let Ok(dirs) = crate::db::project_dirs() {
                    let default = dirs.config_dir().join("config.toml");
                    builder = builder.add_source(config::File::from(default).required(false));
                }
            }
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        let cfg: AppConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate_refresh_secs == 0 {
            return Err(Error::validation("rate_refresh_secs must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::validation("request_timeout_secs must be greater than zero"));
        }
        self.first_weekday()?;
        Ok(())
    }

    pub fn first_weekday(&self) -> Result<Weekday> {
        self.week_start
            .parse::<Weekday>()
            .map_err(|_| Error::validation(format!("Invalid week_start '{}'", self.week_start)))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.rate_refresh_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn endpoints(&self) -> RateEndpoints {
        RateEndpoints {
            direct: self.direct_rate_url.clone(),
            base_rates: self.base_rate_url.clone(),
        }
    }
}
