use crate::error::{EvalError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "RETRIEVAL_EVAL_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub eval: EvalConfig,
}

/// Evaluation defaults, overridable from the command line
#[derive(Debug, Clone, Deserialize)]
pub struct EvalConfig {
    /// Cutoff used when `--k` is not given.
    #[serde(default = "default_k")]
    pub default_k: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            log_level: default_log_level(),
        }
    }
}

fn default_k() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration.
    ///
    /// Loads environment variables from a .env file (if present), then reads the
    /// file named by `RETRIEVAL_EVAL_CONFIG`, falling back to ./eval.toml.
    /// A missing default file is not an error: built-in defaults apply. A path set
    /// explicitly through the environment must exist.
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = PathBuf::from("eval.toml");
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path).map_err(|e| {
            EvalError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&config_str).map_err(|e| {
            EvalError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.eval.default_k == 0 {
            return Err(EvalError::Config(
                "eval.default_k must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn default_k(&self) -> usize {
        self.eval.default_k
    }

    pub fn log_level(&self) -> &str {
        &self.eval.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize tests that mutate the process environment.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn with_config_env(value: &str, f: impl FnOnce()) {
        let original = std::env::var(CONFIG_ENV).ok();
        std::env::set_var(CONFIG_ENV, value);
        f();
        std::env::remove_var(CONFIG_ENV);
        if let Some(val) = original {
            std::env::set_var(CONFIG_ENV, val);
        }
    }

    /// Restores cwd when dropped (e.g. on panic).
    struct CwdGuard(std::path::PathBuf);
    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = std::env::set_current_dir(&self.0);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.default_k(), 10);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eval.toml");
        fs::write(&path, "[eval]\ndefault_k = 5\nlog_level = \"debug\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_k(), 5);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_config_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eval.toml");
        fs::write(&path, "[eval]\nlog_level = \"warn\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.default_k(), 10);
        assert_eq!(config.log_level(), "warn");
    }

    #[test]
    fn test_config_rejects_zero_k() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eval.toml");
        fs::write(&path, "[eval]\ndefault_k = 0\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("default_k"));
    }

    #[test]
    fn test_config_load_from_env() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(&path, "[eval]\ndefault_k = 3\n").unwrap();

        with_config_env(path.to_str().unwrap(), || {
            let config = Config::load().unwrap();
            assert_eq!(config.default_k(), 3);
        });
    }

    #[test]
    fn test_config_invalid_env_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        with_config_env("nonexistent-eval.toml", || {
            let config = Config::load();
            assert!(config.is_err());
        });
    }

    #[test]
    fn test_config_load_without_file_uses_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let _cwd = CwdGuard(std::env::current_dir().unwrap());
        std::env::set_current_dir(temp_dir.path()).unwrap();

        let original = std::env::var(CONFIG_ENV).ok();
        std::env::remove_var(CONFIG_ENV);
        let config = Config::load();
        if let Some(val) = original {
            std::env::set_var(CONFIG_ENV, val);
        }

        let config = config.unwrap();
        assert_eq!(config.default_k(), 10);
        assert_eq!(config.log_level(), "info");
    }
}
