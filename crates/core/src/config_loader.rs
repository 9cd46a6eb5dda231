use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from `config/Config.toml` and its `.json` sibling.
    ///
    /// Missing files are skipped; built-in defaults fill any key not provided.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration source exists but cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration layering defaults, the given TOML file, a JSON file
    /// with the same stem, and `BIZDASH_`-prefixed environment variables
    /// (nested keys use `__`). Later layers win.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment values cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let json_path = path.with_extension("json");

        Self::base()
            .merge(Toml::file(path))
            .merge(Json::file(&json_path))
            .merge(Env::prefixed("BIZDASH_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Loads configuration with a profile overlay (`config/Config.<profile>.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        Self::base()
            .merge(Toml::file(DEFAULT_CONFIG_PATH))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Json::file("config/Config.json"))
            .merge(Env::prefixed("BIZDASH_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load configuration profile '{profile}'"))
    }

    fn base() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
    }
}
