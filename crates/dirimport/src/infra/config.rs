//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::infra::keys::{KeyBinding, Keymap};
use crate::infra::labels::Labels;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".dirimport/config.toml";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub keybindings: Keybindings,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    /// Where the request document is written; stdout when unset.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    compact: Option<bool>,
    #[serde(default)]
    initial_rows: Option<usize>,
}

impl Defaults {
    fn default_compact() -> bool {
        false
    }

    fn default_initial_rows() -> usize {
        1
    }

    /// Upper bound on the rows the form opens with.
    pub const MAX_INITIAL_ROWS: usize = 64;

    pub fn compact(&self) -> bool {
        self.compact.unwrap_or_else(Self::default_compact)
    }

    /// Number of empty rows the form opens with, capped at [`Self::MAX_INITIAL_ROWS`].
    pub fn initial_rows(&self) -> usize {
        self.initial_rows
            .unwrap_or_else(Self::default_initial_rows)
            .min(Self::MAX_INITIAL_ROWS)
    }
}

/// Key bindings as written in config. Unset entries fall back to the built-in chords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Keybindings {
    #[serde(default)]
    add_row: Option<String>,
    #[serde(default)]
    remove_row: Option<String>,
    #[serde(default)]
    submit: Option<String>,
    #[serde(default)]
    quit: Option<String>,
}

impl Keybindings {
    pub fn add_row(&self) -> &str {
        self.add_row.as_deref().unwrap_or("ctrl+n")
    }

    pub fn remove_row(&self) -> &str {
        self.remove_row.as_deref().unwrap_or("ctrl+d")
    }

    pub fn submit(&self) -> &str {
        self.submit.as_deref().unwrap_or("ctrl+s")
    }

    pub fn quit(&self) -> &str {
        self.quit.as_deref().unwrap_or("esc")
    }

    /// Parse every binding, naming the offending entry on failure.
    pub fn resolve(&self) -> Result<Keymap> {
        Ok(Keymap {
            add_row: parse_binding("add_row", self.add_row())?,
            remove_row: parse_binding("remove_row", self.remove_row())?,
            submit: parse_binding("submit", self.submit())?,
            quit: parse_binding("quit", self.quit())?,
        })
    }
}

fn parse_binding(name: &str, value: &str) -> Result<KeyBinding> {
    value
        .parse()
        .with_context(|| format!("invalid key binding for '{name}': '{value}'"))
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    output: Option<String>,
    log_file: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            output: env::var("DIRIMPORT_OUTPUT").ok(),
            log_file: env::var("DIRIMPORT_LOG_FILE").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(output: &str, log_file: &str) -> Self {
        Self {
            output: Some(output.to_owned()),
            log_file: Some(log_file.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config,
    /// an optional explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, explicit, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<&Path>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_toml(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(Self::from_file(explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            keybindings: merge_keybindings(self.keybindings, other.keybindings),
            labels: self.labels.merge(other.labels),
        }
    }
}

fn merge_defaults(mut base: Defaults, overlay: Defaults) -> Defaults {
    if let Some(value) = overlay.output {
        base.output = Some(value);
    }
    if let Some(value) = overlay.log_file {
        base.log_file = Some(value);
    }
    if let Some(value) = overlay.compact {
        base.compact = Some(value);
    }
    if let Some(value) = overlay.initial_rows {
        base.initial_rows = Some(value);
    }
    base
}

fn merge_keybindings(base: Keybindings, overlay: Keybindings) -> Keybindings {
    Keybindings {
        add_row: overlay.add_row.or(base.add_row),
        remove_row: overlay.remove_row.or(base.remove_row),
        submit: overlay.submit.or(base.submit),
        quit: overlay.quit.or(base.quit),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("dirimport/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(output) = env.output.filter(|value| !value.is_empty()) {
        config.defaults.output = Some(PathBuf::from(output));
    }
    if let Some(log_file) = env.log_file.filter(|value| !value.is_empty()) {
        config.defaults.log_file = Some(PathBuf::from(log_file));
    }
    config
}
