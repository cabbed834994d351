//! Solution, package and user environment files.
//!
//! All three are TOML with PascalCase keys:
//!
//! ```toml
//! # solution.toml
//! Name = "arcade"
//! Packages = ["game", "engine"]
//!
//! # package.toml
//! Name = "game"
//! [[Module]]
//! Name = "Engine"
//! Path = "$ENGINE_HOME/src"
//!
//! # <user config>/swamp/env.toml
//! Version = "0.1.3"
//! [[Package]]
//! Name = "Gfx"
//! Path = "/opt/swamp/gfx"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const SOLUTION_FILE_NAME: &str = "solution.toml";
pub const PACKAGE_FILE_NAME: &str = "package.toml";
pub const ENVIRONMENT_FILE_NAME: &str = "env.toml";
pub const MAIN_MODULE_FILE_NAME: &str = "main.swamp";
pub const MODULE_EXTENSION: &str = "swamp";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("environment variable `{0}` is not set")]
    UndefinedVariable(String),
    #[error("unterminated `${{` in path `{0}`")]
    UnterminatedVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SolutionSettings {
    pub name: String,
    #[serde(default)]
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageSettings {
    pub name: String,
    #[serde(default, rename = "Module")]
    pub modules: Vec<ModuleRoot>,
}

/// A package-root module name mapped to a directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleRoot {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvironmentSettings {
    pub version: String,
    #[serde(default, rename = "Package")]
    pub packages: Vec<ModuleRoot>,
}

impl SolutionSettings {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        load_toml(path, Self::from_toml)
    }

    /// Package directories, relative to the solution root.
    pub fn package_dirs(&self, root: &Path) -> Vec<PathBuf> {
        self.packages.iter().map(|p| root.join(p)).collect()
    }
}

impl PackageSettings {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `package.toml` from a package directory. A missing file yields `None`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, SettingsError> {
        let path = dir.join(PACKAGE_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        load_toml(&path, Self::from_toml).map(Some)
    }

    /// Module roots with their paths expanded against the package directory.
    pub fn module_roots(&self, package_dir: &Path) -> Result<Vec<(String, PathBuf)>, SettingsError> {
        self.modules
            .iter()
            .map(|m| Ok((m.name.clone(), expand_path(&m.path, package_dir)?)))
            .collect()
    }
}

impl EnvironmentSettings {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// `<user config dir>/swamp/env.toml`.
    pub fn user_file_path() -> Option<PathBuf> {
        user_config_dir().map(|dir| dir.join("swamp").join(ENVIRONMENT_FILE_NAME))
    }

    /// Load the per-user environment. A missing file yields `None`.
    pub fn load_user() -> Result<Option<Self>, SettingsError> {
        match Self::user_file_path() {
            Some(path) if path.is_file() => load_toml(&path, Self::from_toml).map(Some),
            _ => Ok(None),
        }
    }

    pub fn package_roots(&self, base: &Path) -> Result<Vec<(String, PathBuf)>, SettingsError> {
        self.packages
            .iter()
            .map(|p| Ok((p.name.clone(), expand_path(&p.path, base)?)))
            .collect()
    }
}

fn load_toml<T>(
    path: &Path,
    parse: impl FnOnce(&str) -> Result<T, toml::de::Error>,
) -> Result<T, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand `$NAME` and `${NAME}` from the process environment, then resolve
/// relative results against `base`.
pub fn expand_path(raw: &str, base: &Path) -> Result<PathBuf, SettingsError> {
    expand_path_with(raw, base, |name| env::var(name).ok())
}

pub fn expand_path_with(
    raw: &str,
    base: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<PathBuf, SettingsError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        if chars.peek().is_some_and(|(_, c)| *c == '{') {
            chars.next();
            let mut closed = false;
            for (_, c) in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                name.push(c);
            }
            if !closed {
                return Err(SettingsError::UnterminatedVariable(raw.to_owned()));
            }
        } else {
            while let Some((_, c)) = chars.peek() {
                if !(c.is_ascii_alphanumeric() || *c == '_') {
                    break;
                }
                name.push(*c);
                chars.next();
            }
        }

        if name.is_empty() {
            out.push('$');
            continue;
        }
        let value = lookup(&name).ok_or(SettingsError::UndefinedVariable(name))?;
        out.push_str(&value);
    }

    let path = PathBuf::from(out);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(base.join(path))
    }
}

/// The OS user configuration directory.
pub fn user_config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if cfg!(windows) {
        return env::var_os("APPDATA").map(PathBuf::from);
    }
    let home = PathBuf::from(env::var_os("HOME")?);
    if cfg!(target_os = "macos") {
        return Some(home.join("Library").join("Application Support"));
    }
    Some(home.join(".config"))
}
