//! Configuration management for sitenav.
//!
//! Parses `sitenav.toml` files with serde and provides auto-discovery of
//! config files in parent directories. Everything is validated once at
//! load time; a [`Config`] returned by [`Config::load`] is safe to build a
//! navigation resolver from.
//!
//! ## Locale prefixes
//!
//! Locales are keyed by URL path prefix (`"/"`, `"/zh-CN/"`). A prefix
//! must start with `/`; a missing trailing `/` is appended. Two prefixes
//! that normalize to the same key are rejected, as is a configuration
//! without the default `/` locale.
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `theme.repo`
//! - `plugins.search.app_id`
//! - `plugins.search.api_key`
//! - `plugins.search.index_name`
//! - `plugins.analytics.id`

mod expand;
mod plugins;
mod theme;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use plugins::{
    AnalyticsPluginConfig, BundlerConfig, ComponentDocsPluginConfig, HighlighterPluginConfig,
    PluginDescriptor, PluginsConfig, SearchLocaleConfig, SearchPluginConfig,
};
pub use theme::{
    NavbarGroup, NavbarItem, NavbarLink, SidebarEntry, SidebarSection, ThemeConfig,
    ThemeLocaleConfig, ThemeStrings,
};

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override repository URL.
    pub repo: Option<String>,
    /// Override the branch used in edit links.
    pub docs_branch: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sitenav.toml";

/// Default locale prefix every configuration must register.
pub const DEFAULT_LOCALE: &str = "/";

/// Site configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site title.
    pub title: String,
    /// Site-level locale data keyed by locale prefix.
    pub locales: BTreeMap<String, LocaleConfig>,
    /// Theme options, navbar and sidebar.
    pub theme: ThemeConfig,
    /// External plugin options.
    pub plugins: PluginsConfig,
    /// Bundler options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<BundlerConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            locales: BTreeMap::from([(DEFAULT_LOCALE.to_owned(), LocaleConfig::default())]),
            theme: ThemeConfig::default(),
            plugins: PluginsConfig::default(),
            bundler: None,
            config_path: None,
        }
    }
}

/// Site-level data for one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language tag (e.g. `en-US`).
    pub lang: String,
    /// Overrides the site title for this locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form UI strings used by site components.
    pub strings: BTreeMap<String, String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            lang: "en-US".to_owned(),
            title: None,
            description: None,
            strings: BTreeMap::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Plugin options could not be converted to JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`plugins.search.api_key`").
        field: String,
        /// Error message (e.g., "${`DOCSEARCH_API_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
pub(crate) fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !is_http_url(url) {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Normalize a locale prefix to the `/.../` form.
///
/// # Errors
///
/// Returns `ConfigError::Validation` if the prefix does not start with `/`.
pub fn normalize_locale_prefix(prefix: &str) -> Result<String, ConfigError> {
    if !prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "locale prefix \"{prefix}\" must start with /"
        )));
    }
    if prefix.ends_with('/') {
        Ok(prefix.to_owned())
    } else {
        Ok(format!("{prefix}/"))
    }
}

/// Rebuild a prefix-keyed map with normalized keys.
///
/// Fails when two keys normalize to the same prefix: both would match the
/// same paths with the same length, so neither could win.
fn normalize_keys<V>(
    map: BTreeMap<String, V>,
    field: &str,
) -> Result<BTreeMap<String, V>, ConfigError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut normalized = BTreeMap::new();
    for (key, value) in map {
        let prefix = normalize_locale_prefix(&key)?;
        if let Some(previous) = seen.insert(prefix.clone(), key.clone()) {
            return Err(ConfigError::Validation(format!(
                "{field}: locale prefixes \"{previous}\" and \"{key}\" are ambiguous"
            )));
        }
        normalized.insert(prefix, value);
    }
    Ok(normalized)
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sitenav.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, no config file
    /// can be discovered, or parsing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => Self::discover_config()
                .ok_or_else(|| ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)))?,
        };

        let mut config = Self::load_from_file(&path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// Relative paths are resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, env expansion or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.normalize_locales()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a value has no TOML representation.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::Validation(format!("cannot serialize config: {e}")))
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(repo) = &settings.repo {
            self.theme.repo = Some(repo.clone());
        }
        if let Some(branch) = &settings.docs_branch {
            self.theme.docs_branch = Some(branch.clone());
        }
    }

    /// Describe configured plugins in registration order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if options cannot be represented as JSON.
    pub fn plugin_descriptors(&self) -> Result<Vec<PluginDescriptor>, ConfigError> {
        self.plugins.descriptors()
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            locales = config.locales.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Normalize locale prefixes in every prefix-keyed section.
    fn normalize_locales(&mut self) -> Result<(), ConfigError> {
        self.locales = normalize_keys(std::mem::take(&mut self.locales), "locales")?;
        self.theme.locales =
            normalize_keys(std::mem::take(&mut self.theme.locales), "theme.locales")?;
        if let Some(search) = &mut self.plugins.search {
            search.locales = normalize_keys(
                std::mem::take(&mut search.locales),
                "plugins.search.locales",
            )?;
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading. Configurations built in code
    /// should call it before use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registered = self.validate_locales()?;
        self.validate_theme(&registered)?;
        self.plugins
            .validate(|prefix| registered.iter().any(|known| known == prefix))?;
        if let Some(bundler) = &self.bundler {
            for alias in bundler.aliases.keys() {
                require_non_empty(alias, "bundler.aliases")?;
            }
        }
        Ok(())
    }

    /// Check locale prefixes and return them normalized.
    fn validate_locales(&self) -> Result<Vec<String>, ConfigError> {
        let normalized = normalize_keys(
            self.locales.iter().map(|(k, v)| (k.clone(), v)).collect(),
            "locales",
        )?;
        if !normalized.contains_key(DEFAULT_LOCALE) {
            return Err(ConfigError::Validation(format!(
                "locales must register the default \"{DEFAULT_LOCALE}\" locale"
            )));
        }
        for (prefix, locale) in &normalized {
            require_non_empty(&locale.lang, &format!("locales.\"{prefix}\".lang"))?;
        }
        Ok(normalized.into_keys().collect())
    }

    /// Validate theme locales, navbar and sidebar entries.
    fn validate_theme(&self, registered: &[String]) -> Result<(), ConfigError> {
        if let Some(repo) = &self.theme.repo {
            require_http_url(repo, "theme.repo")?;
        }
        if let Some(branch) = &self.theme.docs_branch {
            require_non_empty(branch, "theme.docs_branch")?;
        }

        let theme_locales = normalize_keys(
            self.theme
                .locales
                .iter()
                .map(|(k, v)| (k.clone(), v))
                .collect(),
            "theme.locales",
        )?;

        for (prefix, locale) in theme_locales {
            let field = format!("theme.locales.\"{prefix}\"");
            if !registered.contains(&prefix) {
                return Err(ConfigError::Validation(format!(
                    "{field} has no matching entry in [locales]"
                )));
            }
            if let Some(repo) = &locale.repo {
                require_http_url(repo, &format!("{field}.repo"))?;
            }
            let pattern = locale
                .edit_link_pattern
                .as_ref()
                .or(self.theme.edit_link_pattern.as_ref());
            let repo = locale.repo.as_ref().or(self.theme.repo.as_ref());
            if pattern.is_some_and(|p| p.contains(":repo")) && repo.is_none() {
                return Err(ConfigError::Validation(format!(
                    "{field}: edit_link_pattern uses :repo but no repo is set"
                )));
            }
            validate_navbar(&locale.navbar, &field)?;
            validate_sidebar(&locale.sidebar, &prefix, registered, &field)?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.theme.repo, "theme.repo")?;

        if let Some(search) = &mut self.plugins.search {
            search.app_id = expand::expand_env(&search.app_id, "plugins.search.app_id")?;
            search.api_key = expand::expand_env(&search.api_key, "plugins.search.api_key")?;
            search.index_name =
                expand::expand_env(&search.index_name, "plugins.search.index_name")?;
        }

        if let Some(analytics) = &mut self.plugins.analytics {
            analytics.id = expand::expand_env(&analytics.id, "plugins.analytics.id")?;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(highlighter) = &mut self.plugins.highlighter
            && highlighter.is_theme_file()
        {
            highlighter.theme = config_dir.join(&highlighter.theme).display().to_string();
        }

        if let Some(component_docs) = &mut self.plugins.component_docs {
            component_docs.components_base_path =
                config_dir.join(&component_docs.components_base_path);
        }

        if let Some(bundler) = &mut self.bundler {
            for dir in bundler.aliases.values_mut() {
                *dir = config_dir.join(&*dir);
            }
        }
    }
}

fn validate_navbar(navbar: &[NavbarItem], field: &str) -> Result<(), ConfigError> {
    for (i, item) in navbar.iter().enumerate() {
        let item_field = format!("{field}.navbar[{i}]");
        require_non_empty(item.text(), &format!("{item_field}.text"))?;
        match item {
            NavbarItem::Link(link) => validate_navbar_link(link, &item_field)?,
            NavbarItem::Group(group) => {
                if group.children.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "{item_field} group \"{}\" has no children",
                        group.text
                    )));
                }
                for (j, child) in group.children.iter().enumerate() {
                    let child_field = format!("{item_field}.children[{j}]");
                    require_non_empty(&child.text, &format!("{child_field}.text"))?;
                    validate_navbar_link(child, &child_field)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_navbar_link(link: &NavbarLink, field: &str) -> Result<(), ConfigError> {
    if link.link.starts_with('/') || is_http_url(&link.link) {
        return Ok(());
    }
    Err(ConfigError::Validation(format!(
        "{field}.link \"{}\" must be an absolute path or http(s) URL",
        link.link
    )))
}

fn validate_sidebar(
    sidebar: &BTreeMap<String, Vec<SidebarEntry>>,
    locale: &str,
    registered: &[String],
    field: &str,
) -> Result<(), ConfigError> {
    for (key, entries) in sidebar {
        let key_field = format!("{field}.sidebar.\"{key}\"");
        require_locale_path(key, registered, &key_field)?;
        for entry in entries {
            if let SidebarEntry::Section(section) = entry {
                require_non_empty(&section.text, &format!("{key_field} section text"))?;
            }
            for path in entry.paths() {
                require_locale_path(path, registered, &key_field)?;
                let owner = owning_locale(path, registered);
                if owner != Some(locale) {
                    tracing::warn!(
                        locale = %locale,
                        path = %path,
                        "Sidebar entry points into another locale"
                    );
                }
            }
        }
    }
    Ok(())
}

/// Require `path` to fall under a registered locale prefix.
fn require_locale_path(path: &str, registered: &[String], field: &str) -> Result<(), ConfigError> {
    if owning_locale(path, registered).is_none() {
        return Err(ConfigError::Validation(format!(
            "{field}: \"{path}\" is not under any registered locale"
        )));
    }
    Ok(())
}

/// Longest registered locale prefix of `path`.
fn owning_locale<'a>(path: &str, registered: &'a [String]) -> Option<&'a str> {
    registered
        .iter()
        .filter(|prefix| path.starts_with(prefix.as_str()))
        .max_by_key(|prefix| prefix.len())
        .map(String::as_str)
}
