use page_composer_engine::blocks::{Breakpoint, EngineOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Page file opened when none is given on the command line
    pub page_path: PathBuf,
    #[serde(default)]
    pub default_breakpoint: Breakpoint,
    #[serde(default)]
    pub engine: EngineOptions,
}

impl Config {
    pub fn new(page_path: PathBuf) -> Self {
        Self {
            page_path,
            default_breakpoint: Breakpoint::default(),
            engine: EngineOptions::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        Self::parse(&content, config_path).map(Some)
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    fn parse(content: &str, config_path: &Path) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the page path
        config.page_path = Self::expand_path(&config.page_path).unwrap_or(config.page_path);

        Ok(config)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/page-composer");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_composer_engine::blocks::ShrinkPolicy;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/page-composer/config.toml"));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"page_path = "/srv/pages/home.json""#,
            Path::new("config.toml"),
        )
        .unwrap();

        assert_eq!(config, Config::new(PathBuf::from("/srv/pages/home.json")));
        assert_eq!(config.engine.shrink_policy, ShrinkPolicy::Discard);
    }

    #[test]
    fn test_engine_section() {
        let config_content = r#"
page_path = "/srv/pages/home.json"
default_breakpoint = "mobile"

[engine]
shrink_policy = "migrate_to_last"
max_containers = 8
"#;

        let config = Config::parse(config_content, Path::new("config.toml")).unwrap();

        assert_eq!(config.default_breakpoint, Breakpoint::Mobile);
        assert_eq!(config.engine.shrink_policy, ShrinkPolicy::MigrateToLast);
        assert_eq!(config.engine.max_containers, 8);
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "page_path = \"home.json\"\n[engine]\nshrink_policy = \"keep_everything\"\n",
        )
        .unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { config_path, .. } if config_path == config_file));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/pages/home.json")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("pages/home.json"));
    }

    #[test]
    fn test_page_path_with_env_var_in_toml() {
        unsafe {
            env::set_var("PAGE_COMPOSER_TEST_ROOT", "/custom/site");
        }

        let config = Config::parse(
            r#"page_path = "$PAGE_COMPOSER_TEST_ROOT/home.json""#,
            Path::new("config.toml"),
        )
        .unwrap();

        assert_eq!(config.page_path, PathBuf::from("/custom/site/home.json"));

        unsafe {
            env::remove_var("PAGE_COMPOSER_TEST_ROOT");
        }
    }

    #[test]
    fn test_relative_path_is_left_alone() {
        let path = PathBuf::from("pages/home.json");
        assert_eq!(Config::expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::new(PathBuf::from("/tmp/site/home.json"));
        test_config.default_breakpoint = Breakpoint::Tablet;
        test_config.engine.shrink_policy = ShrinkPolicy::MigrateToLast;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
