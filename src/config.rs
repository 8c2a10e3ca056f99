//! Configuration for alurio paths and the generative service.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ALURIO_HOME, GEMINI_API_KEY / API_KEY,
//!    ALURIO_SCRIPT_MODEL, ALURIO_POST_MODEL)
//! 2. Config file (.alurio/config.yaml)
//! 3. Defaults (~/.alurio)
//!
//! Config file discovery:
//! - Searches current directory and parents for .alurio/config.yaml
//! - `paths.home` is relative to the .alurio/ directory, `paths.exports`
//!   to the project root

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Script model used when nothing else is configured
pub const DEFAULT_SCRIPT_MODEL: &str = "gemini-3-pro-preview";

/// Post model used when nothing else is configured
pub const DEFAULT_POST_MODEL: &str = "gemini-3-flash-preview";

/// Gemini REST base URL
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .alurio/)
    pub home: Option<String>,
    /// PDF export directory (relative to the project root)
    pub exports: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiConfig {
    pub api_base: Option<String>,
    pub script_model: Option<String>,
    pub post_model: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory holding the profile and library
    pub home: PathBuf,
    /// Default destination for exported documents
    pub exports: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Generative service settings
    pub gemini: GeminiSettings,
}

/// Generative service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// Never read from the config file, only from the environment
    pub api_key: Option<String>,
    pub api_base: String,
    pub script_model: String,
    pub post_model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            script_model: DEFAULT_SCRIPT_MODEL.to_string(),
            post_model: DEFAULT_POST_MODEL.to_string(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".alurio").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
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

/// Read an environment variable, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Merge defaults, an optional config file and the environment
fn resolve(
    default_home: PathBuf,
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let (config_file, config) = match file {
        Some((path, config)) => (Some(path), config),
        None => (None, ConfigFile::default()),
    };

    let alurio_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    let project_root = alurio_dir.parent().unwrap_or(Path::new("."));

    let home = if let Some(env_home) = env("ALURIO_HOME") {
        PathBuf::from(env_home)
    } else if let Some(ref home_path) = config.paths.home {
        resolve_path(alurio_dir, home_path)
    } else {
        default_home
    };

    let exports = match config.paths.exports {
        Some(ref exports_path) => resolve_path(project_root, exports_path),
        None => home.join("exports"),
    };

    let gemini_file = config.gemini.unwrap_or_default();
    let defaults = GeminiSettings::default();
    let gemini = GeminiSettings {
        api_key: env("GEMINI_API_KEY").or_else(|| env("API_KEY")),
        api_base: gemini_file.api_base.unwrap_or(defaults.api_base),
        script_model: env("ALURIO_SCRIPT_MODEL")
            .or(gemini_file.script_model)
            .unwrap_or(defaults.script_model),
        post_model: env("ALURIO_POST_MODEL")
            .or(gemini_file.post_model)
            .unwrap_or(defaults.post_model),
    };

    ResolvedConfig {
        home,
        exports,
        config_file,
        gemini,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".alurio");

    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(default_home, file, env_var))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the alurio state directory
pub fn alurio_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the default export directory
pub fn exports_dir() -> Result<PathBuf> {
    Ok(config()?.exports.clone())
}
