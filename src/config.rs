//! Configuration for truthlens.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TRUTHLENS_BIND, TRUTHLENS_FACTS)
//! 2. Config file (.truthlens/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .truthlens/config.yaml
//! - Falls back to ~/.truthlens/config.yaml
//! - The facts path is relative to the .truthlens/ directory

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{FactTable, InputLimits, Verifier};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const CONFIG_DIR: &str = ".truthlens";
const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: InputLimits,
    #[serde(default)]
    pub facts: FactsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactsConfig {
    /// Replacement fact table (relative to the config directory)
    pub path: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Address the HTTP service listens on
    pub bind: String,
    /// Per-request input limits
    pub limits: InputLimits,
    /// Fact table file; `None` uses the bundled table
    pub facts_path: Option<PathBuf>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            limits: InputLimits::default(),
            facts_path: None,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Load the configured fact table, or the bundled one
    pub fn load_facts(&self) -> Result<FactTable> {
        match &self.facts_path {
            Some(path) => FactTable::from_file(path),
            None => FactTable::bundled(),
        }
    }

    /// Build a verifier from this configuration
    pub fn verifier(&self) -> Result<Verifier> {
        let facts = self.load_facts()?;
        Verifier::with_facts(Arc::new(facts), self.limits.clone())
    }
}

/// Find config file by searching `start` and its parents, then the home directory
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Resolve configuration starting the file search at `start`
fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::default();

    if let Some(config_path) = find_config_file(start) {
        let config = load_config_file(&config_path)?;

        // facts path is relative to .truthlens/
        let config_dir = config_path.parent().unwrap_or(Path::new("."));

        if let Some(bind) = config.server.bind {
            resolved.bind = bind;
        }
        resolved.limits = config.limits;
        resolved.facts_path = config
            .facts
            .path
            .as_deref()
            .map(|p| resolve_path(config_dir, p));
        resolved.config_file = Some(config_path);
    }

    if let Ok(bind) = std::env::var("TRUTHLENS_BIND") {
        resolved.bind = bind;
    }
    if let Ok(facts) = std::env::var("TRUTHLENS_FACTS") {
        resolved.facts_path = Some(PathBuf::from(facts));
    }

    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (bypasses the cache)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1"
server:
  bind: "127.0.0.1:9000"
limits:
  max_input_chars: 500
facts:
  path: ./facts.yaml
"#,
        );

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.version, "1");
        assert_eq!(config.server.bind.as_deref(), Some("127.0.0.1:9000"));
        assert_eq!(config.limits.max_input_chars, 500);
        // Unset limit fields keep their defaults
        assert_eq!(config.limits.max_claims, 100);
        assert_eq!(config.facts.path.as_deref(), Some("./facts.yaml"));
    }

    #[test]
    fn test_discovery_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1"
limits:
  max_claims: 7
facts:
  path: custom-facts.yaml
"#,
        );
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let resolved = load_config_from(&nested).unwrap();
        assert_eq!(resolved.config_file, Some(config_path));
        assert_eq!(resolved.limits.max_claims, 7);
        assert_eq!(
            resolved.facts_path,
            Some(temp.path().join(CONFIG_DIR).join("custom-facts.yaml"))
        );
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1\"");

        let resolved = load_config_from(temp.path()).unwrap();
        assert_eq!(resolved.limits.max_input_chars, 10_000);
        assert!(resolved.facts_path.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: [unclosed");

        assert!(load_config_from(temp.path()).is_err());
    }

    #[test]
    fn test_default_uses_bundled_facts() {
        let config = ResolvedConfig::default();
        assert_eq!(config.bind, "0.0.0.0:8000");
        assert!(config.load_facts().is_ok());
        assert!(config.verifier().is_ok());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project/.truthlens");

        assert_eq!(
            resolve_path(&base, "./facts.yaml"),
            PathBuf::from("/home/user/project/.truthlens/facts.yaml")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/facts.yaml"),
            PathBuf::from("/absolute/facts.yaml")
        );
    }
}
