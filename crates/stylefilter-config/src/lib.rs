use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use stylefilter_core::ArgumentFormat;
use thiserror::Error;

const APP_DIR: &str = "stylefilter";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub style_path: Option<PathBuf>,
    pub spec_path: Option<PathBuf>,
    pub enforce_arity: bool,
    pub arguments: ArgumentFormat,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub indent: usize,
    pub backup_on_write: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            style_path: None,
            spec_path: None,
            enforce_arity: true,
            arguments: ArgumentFormat::default(),
            output: OutputConfig {
                indent: DEFAULT_INDENT,
                backup_on_write: false,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid argument separator: {0:?}")]
    InvalidSeparator(String),
    #[error("invalid output indent: {0} (must be at most 8)")]
    InvalidIndent(usize),
    #[error("invalid {field} path: must not be empty")]
    EmptyPath { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    style_path: Option<PathBuf>,
    spec_path: Option<PathBuf>,
    enforce_arity: Option<bool>,
    arguments: Option<ArgumentsFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArgumentsFile {
    separator: Option<String>,
    trim: Option<bool>,
    infer_types: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    indent: Option<usize>,
    backup_on_write: Option<bool>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = merge_config(parsed)?;
    config.style_path = config.style_path.map(|p| relative_to(path, p));
    config.spec_path = config.spec_path.map(|p| relative_to(path, p));
    Ok(Some(config))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(path) = parsed.style_path {
        config.style_path = Some(non_empty_path(path, "style_path")?);
    }
    if let Some(path) = parsed.spec_path {
        config.spec_path = Some(non_empty_path(path, "spec_path")?);
    }
    if let Some(enforce) = parsed.enforce_arity {
        config.enforce_arity = enforce;
    }

    if let Some(arguments) = parsed.arguments {
        if let Some(raw) = arguments.separator {
            config.arguments.separator = parse_separator(&raw)?;
        }
        if let Some(trim) = arguments.trim {
            config.arguments.trim = trim;
        }
        if let Some(infer) = arguments.infer_types {
            config.arguments.infer_types = infer;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(indent) = output.indent {
            if indent > MAX_INDENT {
                return Err(ConfigError::InvalidIndent(indent));
            }
            config.output.indent = indent;
        }
        if let Some(backup) = output.backup_on_write {
            config.output.backup_on_write = backup;
        }
    }

    Ok(config)
}

fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ArgumentFormat::is_valid_separator(ch) => Ok(ch),
        _ => Err(ConfigError::InvalidSeparator(raw.to_string())),
    }
}

fn non_empty_path(path: PathBuf, field: &'static str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }
    Ok(path)
}

fn relative_to(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path,
    }
}
