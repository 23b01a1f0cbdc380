//! External plugin options.
//!
//! Each plugin has a typed options struct with the fields the plugin
//! recognizes. Options are validated at load time and forwarded
//! unmodified as [`PluginDescriptor`]s.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, require_http_url, require_non_empty};

/// `[plugins]` section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Syntax highlighting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighter: Option<HighlighterPluginConfig>,
    /// Live component documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_docs: Option<ComponentDocsPluginConfig>,
    /// Hosted search index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchPluginConfig>,
    /// Page view analytics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsPluginConfig>,
}

/// Syntax highlighting plugin options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlighterPluginConfig {
    /// Built-in theme name, or a path to a theme JSON file.
    pub theme: String,
}

impl HighlighterPluginConfig {
    /// Whether `theme` names a theme file rather than a built-in theme.
    #[must_use]
    pub fn is_theme_file(&self) -> bool {
        self.theme.ends_with(".json")
    }
}

/// Component documentation plugin options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDocsPluginConfig {
    /// Directory holding component sources (relative to the config file).
    pub components_base_path: PathBuf,
    /// Module specifier to URL map used by live demos.
    #[serde(default)]
    pub import_map: BTreeMap<String, String>,
}

/// Search plugin options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchPluginConfig {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    /// Per-locale UI translations keyed by locale prefix.
    #[serde(default)]
    pub locales: BTreeMap<String, SearchLocaleConfig>,
}

/// Search UI translations for one locale, forwarded verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLocaleConfig {
    pub translations: serde_json::Map<String, serde_json::Value>,
}

/// Analytics plugin options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPluginConfig {
    /// Tracking id.
    pub id: String,
}

/// `[bundler]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Import alias to directory (relative to the config file).
    pub aliases: BTreeMap<String, PathBuf>,
    /// Packages bundled into the server build instead of externalized.
    pub ssr_no_external: Vec<String>,
    /// CSS utility presets enabled in the bundler.
    pub css_presets: Vec<String>,
}

/// Plugin name and the options forwarded to it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub options: serde_json::Value,
}

impl PluginsConfig {
    /// Describe configured plugins in registration order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialize` if options cannot be represented as JSON.
    pub fn descriptors(&self) -> Result<Vec<PluginDescriptor>, ConfigError> {
        let mut descriptors = Vec::new();
        if let Some(highlighter) = &self.highlighter {
            descriptors.push(describe("highlighter", highlighter)?);
        }
        if let Some(component_docs) = &self.component_docs {
            descriptors.push(describe("component-docs", component_docs)?);
        }
        if let Some(search) = &self.search {
            descriptors.push(describe("search", search)?);
        }
        if let Some(analytics) = &self.analytics {
            descriptors.push(describe("analytics", analytics)?);
        }
        Ok(descriptors)
    }

    /// Validate plugin options.
    ///
    /// `locale_known` reports whether a normalized locale prefix is registered.
    pub(crate) fn validate(&self, locale_known: impl Fn(&str) -> bool) -> Result<(), ConfigError> {
        if let Some(highlighter) = &self.highlighter {
            require_non_empty(&highlighter.theme, "plugins.highlighter.theme")?;
        }

        if let Some(component_docs) = &self.component_docs {
            if component_docs.components_base_path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "plugins.component_docs.components_base_path cannot be empty".to_owned(),
                ));
            }
            for (specifier, url) in &component_docs.import_map {
                require_http_url(
                    url,
                    &format!("plugins.component_docs.import_map.\"{specifier}\""),
                )?;
            }
        }

        if let Some(search) = &self.search {
            require_non_empty(&search.app_id, "plugins.search.app_id")?;
            require_non_empty(&search.api_key, "plugins.search.api_key")?;
            require_non_empty(&search.index_name, "plugins.search.index_name")?;
            for prefix in search.locales.keys() {
                let normalized = crate::normalize_locale_prefix(prefix)?;
                if !locale_known(&normalized) {
                    return Err(ConfigError::Validation(format!(
                        "plugins.search.locales.\"{prefix}\" does not match a registered locale"
                    )));
                }
            }
        }

        if let Some(analytics) = &self.analytics {
            require_non_empty(&analytics.id, "plugins.analytics.id")?;
        }

        Ok(())
    }
}

fn describe<T: Serialize>(name: &'static str, options: &T) -> Result<PluginDescriptor, ConfigError> {
    Ok(PluginDescriptor {
        name,
        options: serde_json::to_value(options)?,
    })
}
