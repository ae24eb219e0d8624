//! Reader configuration from the environment.

use lexicon_core::links::is_supported_locale;
use lexicon_core::MeaningSavePolicy;
use std::path::PathBuf;
use thiserror::Error;

pub const DB_PATH_VAR: &str = "LEXICON_DB_PATH";
pub const SAVE_POLICY_VAR: &str = "LEXICON_SAVE_POLICY";
pub const LOCALE_VAR: &str = "LEXICON_LOCALE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LEXICON_LOCALE: unsupported locale {0:?}")]
    UnsupportedLocale(String),

    #[error("LEXICON_SAVE_POLICY: expected \"promote\" or \"defer\", got {0:?}")]
    InvalidSavePolicy(String),

    #[error("no data directory found; set LEXICON_DB_PATH")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    pub db_path: PathBuf,
    pub save_policy: MeaningSavePolicy,
    /// Overrides the stored dictionary locale.
    pub locale: Option<String>,
}

impl ReaderConfig {
    /// Load from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let db_path = match var(DB_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let save_policy = match var(SAVE_POLICY_VAR) {
            Some(value) => MeaningSavePolicy::from_str(&value)
                .ok_or(ConfigError::InvalidSavePolicy(value))?,
            None => MeaningSavePolicy::default(),
        };

        let locale = match var(LOCALE_VAR) {
            Some(code) if is_supported_locale(&code) => Some(code.trim().to_ascii_lowercase()),
            Some(code) => return Err(ConfigError::UnsupportedLocale(code)),
            None => None,
        };

        Ok(Self {
            db_path,
            save_policy,
            locale,
        })
    }
}

fn default_db_path() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("lexicon-reader").join("lexicon.db"))
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ReaderConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReaderConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn explicit_values() {
        let config = load(&[
            (DB_PATH_VAR, "/tmp/lexicon.db"),
            (SAVE_POLICY_VAR, "defer"),
            (LOCALE_VAR, "DE"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/lexicon.db"));
        assert_eq!(config.save_policy, MeaningSavePolicy::DeferToScheduler);
        assert_eq!(config.locale.as_deref(), Some("de"));
    }

    #[test]
    fn defaults() {
        let config = load(&[(DB_PATH_VAR, "x.db")]).unwrap();
        assert_eq!(config.save_policy, MeaningSavePolicy::PromoteToSeen);
        assert_eq!(config.locale, None);
    }

    #[test]
    fn blank_values_are_unset() {
        let config = load(&[(DB_PATH_VAR, "x.db"), (LOCALE_VAR, "  ")]).unwrap();
        assert_eq!(config.locale, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[(DB_PATH_VAR, "x.db"), (SAVE_POLICY_VAR, "always")]),
            Err(ConfigError::InvalidSavePolicy(_))
        ));
        assert!(matches!(
            load(&[(DB_PATH_VAR, "x.db"), (LOCALE_VAR, "en")]),
            Err(ConfigError::UnsupportedLocale(_))
        ));
    }
}
