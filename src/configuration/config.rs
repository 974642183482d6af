#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    PageFile,
    StoreFile,
    TabSwitchDelay,
    ToastDuration,
}

impl ConfigKey {
    fn is_duration(&self) -> bool {
        return *self == ConfigKey::TabSwitchDelay || *self == ConfigKey::ToastDuration;
    }
}

pub fn cache_dir() -> path::PathBuf {
    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("marquee");
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// Milliseconds stored under `key`, or its default when unset or not a
    /// number.
    pub fn get_millis(key: ConfigKey) -> u64 {
        if let Ok(val) = Config::get(key).parse::<u64>() {
            return val;
        }

        return Config::default(key).parse::<u64>().unwrap_or_default();
    }

    pub fn default(key: ConfigKey) -> String {
        let dir = cache_dir();

        match key {
            ConfigKey::ApiURL => return "http://localhost:8000".to_string(),
            ConfigKey::TabSwitchDelay => return "1500".to_string(),
            ConfigKey::ToastDuration => return "3000".to_string(),

            // Paths
            ConfigKey::ConfigFile => return dir.join("config.toml").to_string_lossy().to_string(),
            ConfigKey::PageFile => return dir.join("page.html").to_string_lossy().to_string(),
            ConfigKey::StoreFile => return dir.join("storage.json").to_string_lossy().to_string(),
        }
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key.is_duration() && val.parse::<u64>().is_err() {
            bail!(format!(
                "config.toml has an invalid value for key '{key}': {val}\nExpected a number of milliseconds"
            ));
        }

        if key == ConfigKey::ApiURL && !val.starts_with("http://") && !val.starts_with("https://")
        {
            bail!(format!(
                "config.toml has an invalid value for key '{key}': {val}\nExpected an http(s) URL"
            ));
        }

        return Ok(());
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    if let Some(val_int) = val.as_integer() {
                        Config::validate(key, &val_int.to_string())?;
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        Config::validate(key, val_str)?;
                        Config::set(key, val_str);
                    }
                }
            }
        }

        // Flags and environment variables win over the config file.
        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            api_url = %Config::get(ConfigKey::ApiURL),
            page_file = %Config::get(ConfigKey::PageFile),
            store_file = %Config::get(ConfigKey::StoreFile),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.parse::<u64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
