// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Deserialize;
use std::{env, fs, path::Path};

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocalConfig {
    pub user_id: String,
    pub email: Option<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            email: None,
        }
    }
}

/// `config.toml` in the platform config dir, then `FLUXO_*` environment overrides.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Hosted backend; absent means the local SQLite store is used.
    pub remote: Option<RemoteConfig>,
    pub local: LocalConfig,
    pub page_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: None,
            local: LocalConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn config_path() -> Result<std::path::PathBuf> {
    Ok(crate::db::project_dirs()?.config_dir().join("config.toml"))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path_ref, e)))?;
    parse_config(&contents)
}

/// Applies environment overrides; `lookup` is `std::env::var` outside tests.
pub fn apply_env<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("FLUXO_BACKEND_URL").filter(|s| !s.trim().is_empty());
    let key = lookup("FLUXO_BACKEND_KEY").filter(|s| !s.trim().is_empty());
    match (url, key, config.remote.take()) {
        (Some(url), Some(anon_key), _) => config.remote = Some(RemoteConfig { url, anon_key }),
        (Some(url), None, Some(r)) => {
            config.remote = Some(RemoteConfig {
                url,
                anon_key: r.anon_key,
            })
        }
        (None, Some(anon_key), Some(r)) => {
            config.remote = Some(RemoteConfig { url: r.url, anon_key })
        }
        (Some(_), None, None) => {
            return Err(Error::Config(
                "FLUXO_BACKEND_URL is set but no FLUXO_BACKEND_KEY was given".into(),
            ));
        }
        (_, _, existing) => config.remote = existing,
    }
    if let Some(raw) = lookup("FLUXO_PAGE_SIZE") {
        config.page_size = raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid FLUXO_PAGE_SIZE '{}'", raw)))?;
    }
    if config.page_size == 0 {
        return Err(Error::Config("page_size must be at least 1".into()));
    }
    Ok(config)
}

/// Loads the config file if present and applies the environment.
pub fn load_app_configuration() -> Result<Config> {
    let path = config_path()?;
    let config = if path.exists() {
        load_config(&path)?
    } else {
        tracing::debug!("no config file at {}; using defaults", path.display());
        Config::default()
    };
    apply_env(config, |k| env::var(k).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_file_means_local_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.local.user_id, "local");
    }

    #[test]
    fn remote_section_is_read() {
        let cfg = parse_config(
            r#"
            page_size = 25
            [remote]
            url = "https://abc.example.co"
            anon_key = "k"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.page_size, 25);
        assert_eq!(cfg.remote.unwrap().url, "https://abc.example.co");
    }

    #[test]
    fn env_overrides_file() {
        let cfg = apply_env(
            Config::default(),
            env_of(&[
                ("FLUXO_BACKEND_URL", "https://x.example.co"),
                ("FLUXO_BACKEND_KEY", "anon"),
                ("FLUXO_PAGE_SIZE", "5"),
            ]),
        )
        .unwrap();
        assert_eq!(
            cfg.remote,
            Some(RemoteConfig {
                url: "https://x.example.co".into(),
                anon_key: "anon".into()
            })
        );
        assert_eq!(cfg.page_size, 5);
    }

    #[test]
    fn url_without_key_is_an_error() {
        let err = apply_env(
            Config::default(),
            env_of(&[("FLUXO_BACKEND_URL", "https://x.example.co")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("FLUXO_BACKEND_KEY"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(apply_env(Config::default(), env_of(&[("FLUXO_PAGE_SIZE", "0")])).is_err());
    }
}
