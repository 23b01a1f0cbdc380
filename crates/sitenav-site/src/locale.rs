//! Locale bundles and longest-prefix locale lookup.
//!
//! A [`LocaleBundle`] merges three layers of configuration for one locale
//! prefix: the site-level `[locales."<prefix>"]` entry, the theme-level
//! `[theme.locales."<prefix>"]` entry and the theme-wide defaults in
//! `[theme]`. Theme locale values win over theme-wide values, which win
//! over built-in English defaults.

use std::collections::BTreeMap;

use serde::Serialize;
use sitenav_config::{
    Config, ConfigError, DEFAULT_LOCALE, LocaleConfig, NavbarItem, SidebarEntry, ThemeConfig,
    ThemeLocaleConfig, ThemeStrings, normalize_locale_prefix,
};

use crate::prefix::{longest_match, matches_prefix};

/// Branch used in edit links when none is configured.
const DEFAULT_DOCS_BRANCH: &str = "main";

/// Resolved theme UI strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UiStrings {
    pub select_language_text: String,
    pub select_language_name: String,
    pub tip: String,
    pub warning: String,
    pub danger: String,
    pub contributors_text: String,
    pub last_updated_text: String,
    pub edit_link_text: String,
}

impl UiStrings {
    /// Resolve `strings`, using `lang` as the language name fallback.
    fn resolve(strings: ThemeStrings, lang: &str) -> Self {
        let or = |value: Option<String>, default: &str| {
            value.unwrap_or_else(|| default.to_owned())
        };
        Self {
            select_language_text: or(strings.select_language_text, "Languages"),
            select_language_name: or(strings.select_language_name, lang),
            tip: or(strings.tip, "TIP"),
            warning: or(strings.warning, "WARNING"),
            danger: or(strings.danger, "DANGER"),
            contributors_text: or(strings.contributors_text, "Contributors"),
            last_updated_text: or(strings.last_updated_text, "Last Updated"),
            edit_link_text: or(strings.edit_link_text, "Edit this page"),
        }
    }
}

/// Everything needed to render pages of one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleBundle {
    /// Locale prefix, always in `/.../` form.
    pub prefix: String,
    /// Language tag.
    pub lang: String,
    /// Site title for this locale.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Theme UI strings.
    pub strings: UiStrings,
    /// Site-level UI strings.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub site_strings: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_dark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link_pattern: Option<String>,
    /// Branch used in edit links.
    pub docs_branch: String,
    navbar: Vec<NavbarItem>,
    #[serde(skip)]
    sidebar: BTreeMap<String, Vec<SidebarEntry>>,
}

impl LocaleBundle {
    /// Merge site, theme-locale and theme-wide settings for `prefix`.
    fn merge(
        prefix: String,
        site_title: &str,
        site: &LocaleConfig,
        theme: &ThemeConfig,
        theme_locale: Option<&ThemeLocaleConfig>,
    ) -> Self {
        let empty = ThemeLocaleConfig::default();
        let local = theme_locale.unwrap_or(&empty);
        let layer = |own: Option<&String>, shared: Option<&String>| own.or(shared).cloned();

        Self {
            lang: site.lang.clone(),
            title: site.title.clone().unwrap_or_else(|| site_title.to_owned()),
            description: site.description.clone(),
            strings: UiStrings::resolve(local.strings.or(&theme.strings), &site.lang),
            site_strings: site.strings.clone(),
            logo: layer(local.logo.as_ref(), theme.logo.as_ref()),
            logo_dark: layer(local.logo_dark.as_ref(), theme.logo_dark.as_ref()),
            repo: layer(local.repo.as_ref(), theme.repo.as_ref()),
            repo_label: layer(local.repo_label.as_ref(), theme.repo_label.as_ref()),
            edit_link_pattern: layer(
                local.edit_link_pattern.as_ref(),
                theme.edit_link_pattern.as_ref(),
            ),
            docs_branch: theme
                .docs_branch
                .clone()
                .unwrap_or_else(|| DEFAULT_DOCS_BRANCH.to_owned()),
            navbar: local.navbar.clone(),
            sidebar: local.sidebar.clone(),
            prefix,
        }
    }

    /// Ordered navbar, exactly as authored.
    #[must_use]
    pub fn navbar(&self) -> &[NavbarItem] {
        &self.navbar
    }

    /// Sidebar entries for `path`.
    ///
    /// Uses the longest sidebar key that prefixes `path`. Entries under
    /// shorter matching keys are never mixed in. Returns an empty slice
    /// when no key matches.
    #[must_use]
    pub fn sidebar(&self, path: &str) -> &[SidebarEntry] {
        self.sidebar_match(path)
            .map(|(_, entries)| entries)
            .unwrap_or_default()
    }

    /// Sidebar key selected for `path` together with its entries.
    #[must_use]
    pub fn sidebar_match(&self, path: &str) -> Option<(&str, &[SidebarEntry])> {
        longest_match(&self.sidebar, path).map(|(key, entries)| (key, entries.as_slice()))
    }

    /// Whether this locale's prefix covers `path`.
    #[must_use]
    pub fn covers(&self, path: &str) -> bool {
        matches_prefix(path, &self.prefix)
    }
}

/// Registered locales, searchable by longest prefix.
#[derive(Debug)]
pub struct LocaleTable {
    /// Sorted longest prefix first.
    bundles: Vec<LocaleBundle>,
    default: usize,
}

impl LocaleTable {
    /// Build the table from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a prefix is malformed or the
    /// default `/` locale is missing.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut theme_locales = BTreeMap::new();
        for (prefix, locale) in &config.theme.locales {
            theme_locales.insert(normalize_locale_prefix(prefix)?, locale);
        }

        let mut bundles = config
            .locales
            .iter()
            .map(|(prefix, site)| {
                let prefix = normalize_locale_prefix(prefix)?;
                let theme_locale = theme_locales.get(&prefix).copied();
                Ok(LocaleBundle::merge(
                    prefix,
                    &config.title,
                    site,
                    &config.theme,
                    theme_locale,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        bundles.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });

        let default = bundles
            .iter()
            .position(|bundle| bundle.prefix == DEFAULT_LOCALE)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "locales must register the default \"{DEFAULT_LOCALE}\" locale"
                ))
            })?;

        Ok(Self { bundles, default })
    }

    /// Locale for `path`: the longest registered prefix of `path`, or the
    /// default locale.
    #[must_use]
    pub fn resolve(&self, path: &str) -> &LocaleBundle {
        self.bundles
            .iter()
            .find(|bundle| bundle.covers(path))
            .unwrap_or(&self.bundles[self.default])
    }

    /// Locale registered under exactly `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&LocaleBundle> {
        self.bundles.iter().find(|bundle| bundle.prefix == prefix)
    }

    /// The default `/` locale.
    #[must_use]
    pub fn default_locale(&self) -> &LocaleBundle {
        &self.bundles[self.default]
    }

    /// All locales in prefix order.
    pub fn iter(&self) -> impl Iterator<Item = &LocaleBundle> {
        let mut sorted: Vec<_> = self.bundles.iter().collect();
        sorted.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        sorted.into_iter()
    }

    /// Number of registered locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Always false: the default locale is mandatory.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locale(lang: &str) -> LocaleConfig {
        LocaleConfig {
            lang: lang.to_owned(),
            ..Default::default()
        }
    }

    fn config() -> Config {
        let mut config = Config {
            title: "Casual UI - Vue".to_owned(),
            ..Default::default()
        };
        config.locales.insert("/zh-CN/".to_owned(), locale("zh-CN"));
        config.locales.insert("/zh-CN/tw/".to_owned(), locale("zh-TW"));
        config
    }

    #[test]
    fn test_resolve_longest_prefix() {
        let table = LocaleTable::from_config(&config()).unwrap();

        assert_eq!(table.resolve("/zh-CN/guide/install/").prefix, "/zh-CN/");
        assert_eq!(table.resolve("/zh-CN/tw/guide/").prefix, "/zh-CN/tw/");
        assert_eq!(table.resolve("/guide/").prefix, "/");
    }

    #[test]
    fn test_unregistered_prefix_falls_back_to_default() {
        let table = LocaleTable::from_config(&config()).unwrap();

        let bundle = table.resolve("/fr/guide/");

        assert_eq!(bundle.prefix, "/");
        assert_eq!(bundle.lang, "en-US");
    }

    #[test]
    fn test_bare_locale_root_resolves_to_locale() {
        let table = LocaleTable::from_config(&config()).unwrap();
        assert_eq!(table.resolve("/zh-CN").prefix, "/zh-CN/");
    }

    #[test]
    fn test_prefixes_without_trailing_slash_are_normalized() {
        let mut config = Config::default();
        config.locales.insert("/fr".to_owned(), locale("fr-FR"));

        let table = LocaleTable::from_config(&config).unwrap();

        assert_eq!(table.resolve("/fr/guide/").prefix, "/fr/");
        assert!(table.get("/fr/").is_some());
    }

    #[test]
    fn test_missing_default_locale_is_error() {
        let config = Config {
            locales: BTreeMap::from([("/zh-CN/".to_owned(), locale("zh-CN"))]),
            ..Default::default()
        };

        let err = LocaleTable::from_config(&config).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_iter_in_prefix_order() {
        let table = LocaleTable::from_config(&config()).unwrap();
        let prefixes: Vec<_> = table.iter().map(|b| b.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["/", "/zh-CN/", "/zh-CN/tw/"]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_merge_precedence() {
        let mut config = config();
        config.theme.logo = Some("/logo.png".to_owned());
        config.theme.repo = Some("https://github.com/Casual-UI/vue".to_owned());
        config.theme.strings = ThemeStrings {
            tip: Some("Hint".to_owned()),
            edit_link_text: Some("Edit on GitHub".to_owned()),
            ..Default::default()
        };
        config.theme.locales.insert(
            "/zh-CN/".to_owned(),
            ThemeLocaleConfig {
                logo: Some("/logo-zh.png".to_owned()),
                strings: ThemeStrings {
                    edit_link_text: Some("在Github上编辑此页".to_owned()),
                    select_language_name: Some("简体中文".to_owned()),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        config.locales.get_mut("/zh-CN/").unwrap().title = Some("Casual UI 中文".to_owned());

        let table = LocaleTable::from_config(&config).unwrap();
        let zh = table.get("/zh-CN/").unwrap();
        let en = table.default_locale();

        assert_eq!(zh.logo.as_deref(), Some("/logo-zh.png"));
        assert_eq!(zh.repo.as_deref(), Some("https://github.com/Casual-UI/vue"));
        assert_eq!(zh.title, "Casual UI 中文");
        assert_eq!(zh.strings.edit_link_text, "在Github上编辑此页");
        assert_eq!(zh.strings.tip, "Hint");
        assert_eq!(zh.strings.select_language_name, "简体中文");
        assert_eq!(zh.strings.warning, "WARNING");
        assert_eq!(zh.docs_branch, "main");

        assert_eq!(en.logo.as_deref(), Some("/logo.png"));
        assert_eq!(en.title, "Casual UI - Vue");
        assert_eq!(en.strings.edit_link_text, "Edit on GitHub");
        assert_eq!(en.strings.select_language_name, "en-US");
    }

    #[test]
    fn test_sidebar_longest_key_only() {
        let mut config = Config::default();
        config.theme.locales.insert(
            "/".to_owned(),
            ThemeLocaleConfig {
                sidebar: BTreeMap::from([
                    (
                        "/components/".to_owned(),
                        vec![SidebarEntry::Link("/components/button/".to_owned())],
                    ),
                    (
                        "/components/form/".to_owned(),
                        vec![SidebarEntry::Link("/components/form/input/".to_owned())],
                    ),
                ]),
                ..Default::default()
            },
        );
        let table = LocaleTable::from_config(&config).unwrap();
        let bundle = table.default_locale();

        assert_eq!(
            bundle.sidebar("/components/form/select/"),
            &[SidebarEntry::Link("/components/form/input/".to_owned())]
        );
        assert_eq!(
            bundle.sidebar_match("/components/tag/").map(|(key, _)| key),
            Some("/components/")
        );
        assert!(bundle.sidebar("/usable/").is_empty());
    }
}
