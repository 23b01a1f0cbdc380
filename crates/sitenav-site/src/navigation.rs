//! Per-page navigation resolution.
//!
//! [`Navigation`] is built once from a validated [`Config`] and answers
//! every page request with pure lookups: the active locale, its navbar,
//! the sidebar section for the page and the derived links (edit link,
//! locale switcher). It holds no interior mutability and can be shared
//! across threads behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::Serialize;
use sitenav_config::{
    Config, ConfigError, DEFAULT_LOCALE, NavbarItem, SidebarEntry, normalize_locale_prefix,
};

use crate::edit_link;
use crate::locale::{LocaleBundle, LocaleTable};
use crate::prefix::{request_path, same_page};

/// Source of page titles for flat sidebar links.
///
/// Page titles live in the pages themselves, outside the navigation
/// config. Implemented for plain maps from page path to title.
pub trait PageTitles {
    /// Title of the page at `path`, if known.
    fn title(&self, path: &str) -> Option<String>;
}

impl<S: BuildHasher> PageTitles for HashMap<String, String, S> {
    fn title(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

impl PageTitles for BTreeMap<String, String> {
    fn title(&self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

/// Title source that knows no titles; links are labeled by their path.
pub struct NullPageTitles;

impl PageTitles for NullPageTitles {
    fn title(&self, _path: &str) -> Option<String> {
        None
    }
}

/// Rendered sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarItem {
    Link(SidebarLink),
    Section(SidebarSectionView),
}

/// Rendered sidebar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarLink {
    pub text: String,
    pub link: String,
    /// Link points at the requested page.
    pub active: bool,
}

/// Rendered sidebar section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarSectionView {
    pub text: String,
    pub collapsible: bool,
    /// Open on first render: always for non-collapsible sections,
    /// otherwise only when the section holds the requested page.
    pub expanded: bool,
    pub children: Vec<SidebarLink>,
}

/// Edit link for a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditLink {
    pub text: String,
    pub url: String,
}

/// Entry of the locale switcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleLink {
    pub text: String,
    pub lang: String,
    /// Same page under the target locale.
    pub link: String,
    pub active: bool,
}

/// Everything the page renderer needs for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedPage {
    pub path: String,
    /// Active locale prefix.
    pub locale: String,
    pub lang: String,
    pub title: String,
    pub navbar: Vec<NavbarItem>,
    /// Sidebar key the entries came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_key: Option<String>,
    pub sidebar: Vec<SidebarItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLink>,
    pub locales: Vec<LocaleLink>,
}

/// Immutable site navigation.
#[derive(Debug)]
pub struct Navigation {
    locales: LocaleTable,
    search_translations: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
}

impl Navigation {
    /// Build navigation from configuration.
    ///
    /// Validates `config` first, so configurations assembled in code get
    /// the same checks as loaded ones.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let locales = LocaleTable::from_config(config)?;

        let mut search_translations = BTreeMap::new();
        if let Some(search) = &config.plugins.search {
            for (prefix, locale) in &search.locales {
                search_translations.insert(
                    normalize_locale_prefix(prefix)?,
                    locale.translations.clone(),
                );
            }
        }

        tracing::debug!(locales = locales.len(), "Built site navigation");
        Ok(Self {
            locales,
            search_translations,
        })
    }

    /// Locale table.
    #[must_use]
    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    /// Active locale for `path`.
    #[must_use]
    pub fn locale(&self, path: &str) -> &LocaleBundle {
        self.locales.resolve(&request_path(path))
    }

    /// Navbar of the locale active at `path`.
    #[must_use]
    pub fn navbar(&self, path: &str) -> &[NavbarItem] {
        self.locale(path).navbar()
    }

    /// Sidebar entries for `path` within its active locale.
    ///
    /// Paths under an unregistered locale (`/fr/guide/`) fall back to the
    /// default locale, whose sidebar is matched against the path without
    /// its first segment (`/guide/`) when the full path matches no key.
    #[must_use]
    pub fn sidebar(&self, path: &str) -> &[SidebarEntry] {
        let path = request_path(path);
        sidebar_match(self.locales.resolve(&path), &path)
            .map(|(_, entries)| entries)
            .unwrap_or_default()
    }

    /// Search UI translations registered for exactly `locale`.
    #[must_use]
    pub fn search_translations(
        &self,
        locale: &LocaleBundle,
    ) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.search_translations.get(&locale.prefix)
    }

    /// Edit link for `path`, if the locale has an edit link pattern.
    #[must_use]
    pub fn edit_link(&self, path: &str) -> Option<EditLink> {
        let path = request_path(path);
        let locale = self.locales.resolve(&path);
        let pattern = locale.edit_link_pattern.as_deref()?;
        let url = edit_link::expand(pattern, locale.repo.as_deref(), &locale.docs_branch, &path)?;
        Some(EditLink {
            text: locale.strings.edit_link_text.clone(),
            url,
        })
    }

    /// The page at `path` under every registered locale, in prefix order.
    #[must_use]
    pub fn locale_links(&self, path: &str) -> Vec<LocaleLink> {
        let path = request_path(path);
        let active = self.locales.resolve(&path);
        let rest = path.strip_prefix(active.prefix.as_str()).unwrap_or("");

        self.locales
            .iter()
            .map(|locale| LocaleLink {
                text: locale.strings.select_language_name.clone(),
                lang: locale.lang.clone(),
                link: format!("{}{rest}", locale.prefix),
                active: locale.prefix == active.prefix,
            })
            .collect()
    }

    /// Resolve everything needed to render the page at `path`.
    pub fn resolve_page(&self, path: &str, titles: &dyn PageTitles) -> ResolvedPage {
        let path = request_path(path);
        let locale = self.locales.resolve(&path);
        let matched = sidebar_match(locale, &path);
        let entries = matched.map(|(_, entries)| entries).unwrap_or_default();
        let sidebar = render_sidebar(entries, &path, titles);

        tracing::debug!(
            path = %path,
            locale = %locale.prefix,
            sidebar_items = sidebar.len(),
            "Resolved page navigation"
        );

        ResolvedPage {
            path: path.to_string(),
            locale: locale.prefix.clone(),
            lang: locale.lang.clone(),
            title: locale.title.clone(),
            navbar: locale.navbar().to_vec(),
            sidebar_key: matched.map(|(key, _)| key.to_owned()),
            sidebar,
            edit_link: self.edit_link(&path),
            locales: self.locale_links(&path),
        }
    }
}

/// Longest sidebar match for `path`, retrying the default locale with the
/// first path segment removed.
fn sidebar_match<'a>(
    locale: &'a LocaleBundle,
    path: &str,
) -> Option<(&'a str, &'a [SidebarEntry])> {
    locale.sidebar_match(path).or_else(|| {
        if locale.prefix != DEFAULT_LOCALE {
            return None;
        }
        locale.sidebar_match(strip_first_segment(path)?)
    })
}

/// `/fr/guide/` -> `/guide/`. `None` when nothing but `/` would remain.
fn strip_first_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let stripped = &rest[rest.find('/')?..];
    (stripped.len() > 1).then_some(stripped)
}

/// Render sidebar entries for the page at `current`, preserving order.
pub fn render_sidebar(
    entries: &[SidebarEntry],
    current: &str,
    titles: &dyn PageTitles,
) -> Vec<SidebarItem> {
    entries
        .iter()
        .map(|entry| match entry {
            SidebarEntry::Link(path) => SidebarItem::Link(render_link(path, current, titles)),
            SidebarEntry::Section(section) => {
                let children: Vec<_> = section
                    .children
                    .iter()
                    .map(|path| render_link(path, current, titles))
                    .collect();
                let expanded = !section.collapsible || children.iter().any(|link| link.active);
                SidebarItem::Section(SidebarSectionView {
                    text: section.text.clone(),
                    collapsible: section.collapsible,
                    expanded,
                    children,
                })
            }
        })
        .collect()
}

fn render_link(path: &str, current: &str, titles: &dyn PageTitles) -> SidebarLink {
    let text = titles
        .title(path)
        .or_else(|| {
            let alternate = match path.strip_suffix('/') {
                Some(bare) => bare.to_owned(),
                None => format!("{path}/"),
            };
            titles.title(&alternate)
        })
        .unwrap_or_else(|| path.to_owned());

    SidebarLink {
        text,
        link: path.to_owned(),
        active: same_page(path, current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sitenav_config::{
        LocaleConfig, NavbarGroup, NavbarLink, SearchLocaleConfig, SearchPluginConfig,
        SidebarSection, ThemeLocaleConfig, ThemeStrings,
    };

    static_assertions::assert_impl_all!(super::Navigation: Send, Sync);

    fn link(text: &str, target: &str) -> NavbarLink {
        NavbarLink {
            text: text.to_owned(),
            link: target.to_owned(),
        }
    }

    fn config() -> Config {
        let mut config = Config {
            title: "Casual UI - Vue".to_owned(),
            ..Default::default()
        };
        config.locales.insert(
            "/zh-CN/".to_owned(),
            LocaleConfig {
                lang: "zh-CN".to_owned(),
                ..Default::default()
            },
        );
        config.theme.repo = Some("https://github.com/Casual-UI/vue".to_owned());
        config.theme.edit_link_pattern = Some(":repo/edit/:branch/packages/docs/:path".to_owned());
        config.theme.strings.select_language_name = Some("English".to_owned());
        config.theme.locales.insert(
            "/".to_owned(),
            ThemeLocaleConfig {
                navbar: vec![
                    NavbarItem::Group(NavbarGroup {
                        text: "Guide".to_owned(),
                        children: vec![link("Install", "/guide/install/")],
                    }),
                    NavbarItem::Link(link("Svelte", "https://svelte.casual-ui.site/")),
                ],
                sidebar: BTreeMap::from([
                    (
                        "/guide/".to_owned(),
                        vec![
                            SidebarEntry::Link("/guide/install/".to_owned()),
                            SidebarEntry::Link("/guide/i18n/".to_owned()),
                        ],
                    ),
                    (
                        "/components/".to_owned(),
                        vec![
                            SidebarEntry::Section(SidebarSection {
                                text: "Basic".to_owned(),
                                collapsible: true,
                                children: vec!["/components/button/".to_owned()],
                            }),
                            SidebarEntry::Section(SidebarSection {
                                text: "Form".to_owned(),
                                collapsible: true,
                                children: vec!["/components/form/input/".to_owned()],
                            }),
                            SidebarEntry::Section(SidebarSection {
                                text: "Data".to_owned(),
                                collapsible: false,
                                children: vec!["/components/data-presentation/list".to_owned()],
                            }),
                        ],
                    ),
                ]),
                ..Default::default()
            },
        );
        config.theme.locales.insert(
            "/zh-CN/".to_owned(),
            ThemeLocaleConfig {
                strings: ThemeStrings {
                    select_language_name: Some("简体中文".to_owned()),
                    edit_link_text: Some("在Github上编辑此页".to_owned()),
                    ..Default::default()
                },
                sidebar: BTreeMap::from([(
                    "/zh-CN/guide/".to_owned(),
                    vec![SidebarEntry::Link("/zh-CN/guide/install/".to_owned())],
                )]),
                ..Default::default()
            },
        );
        config
    }

    fn navigation() -> Navigation {
        Navigation::from_config(&config()).unwrap()
    }

    #[test]
    fn test_locale_resolution() {
        let nav = navigation();

        assert_eq!(nav.locale("/zh-CN/guide/install/").prefix, "/zh-CN/");
        assert_eq!(nav.locale("/fr/guide/").prefix, "/");
        assert_eq!(nav.locale("zh-CN/guide/").prefix, "/zh-CN/");
    }

    #[test]
    fn test_navbar_is_verbatim() {
        let nav = navigation();

        let texts: Vec<_> = nav.navbar("/guide/").iter().map(NavbarItem::text).collect();

        assert_eq!(texts, vec!["Guide", "Svelte"]);
        assert!(nav.navbar("/zh-CN/").is_empty());
    }

    #[test]
    fn test_sidebar_uses_default_locale_for_unknown_prefix() {
        let nav = navigation();

        assert_eq!(
            nav.sidebar("/fr/guide/"),
            nav.locales().default_locale().sidebar("/guide/")
        );
        assert_eq!(nav.sidebar("/fr/guide/").len(), 2);
        let page = nav.resolve_page("/fr/guide/", &NullPageTitles);
        assert_eq!(page.locale, "/");
        assert_eq!(page.sidebar_key.as_deref(), Some("/guide/"));
    }

    #[test]
    fn test_sidebar_without_match_is_empty() {
        let nav = navigation();

        assert_eq!(nav.sidebar("/guide/i18n/").len(), 2);
        assert!(nav.sidebar("/usable/").is_empty());
        assert!(nav.sidebar("/fr/").is_empty());
        assert!(nav.sidebar("/zh-CN/usable/").is_empty());
    }

    #[test]
    fn test_registered_locale_never_strips_segments() {
        let nav = navigation();
        // "/zh-CN/components/" must not fall through to "/components/".
        assert!(nav.sidebar("/zh-CN/components/button/").is_empty());
    }

    #[test]
    fn test_strip_first_segment() {
        assert_eq!(strip_first_segment("/fr/guide/"), Some("/guide/"));
        assert_eq!(strip_first_segment("/fr/"), None);
        assert_eq!(strip_first_segment("/fr"), None);
    }

    #[test]
    fn test_resolve_page_titles_and_active() {
        let nav = navigation();
        let titles = HashMap::from([
            ("/guide/install/".to_owned(), "Install".to_owned()),
            ("/guide/i18n".to_owned(), "I18n".to_owned()),
        ]);

        let page = nav.resolve_page("/guide/i18n/", &titles);

        assert_eq!(page.sidebar_key.as_deref(), Some("/guide/"));
        assert_eq!(
            page.sidebar,
            vec![
                SidebarItem::Link(SidebarLink {
                    text: "Install".to_owned(),
                    link: "/guide/install/".to_owned(),
                    active: false,
                }),
                SidebarItem::Link(SidebarLink {
                    text: "I18n".to_owned(),
                    link: "/guide/i18n/".to_owned(),
                    active: true,
                }),
            ]
        );
    }

    #[test]
    fn test_collapsible_sections_expand_around_active_page() {
        let nav = navigation();

        let page = nav.resolve_page("/components/form/input/", &NullPageTitles);

        let expanded: Vec<_> = page
            .sidebar
            .iter()
            .map(|item| match item {
                SidebarItem::Section(section) => (section.text.as_str(), section.expanded),
                SidebarItem::Link(_) => panic!("expected sections only"),
            })
            .collect();
        assert_eq!(expanded, vec![("Basic", false), ("Form", true), ("Data", true)]);
    }

    #[test]
    fn test_untitled_link_uses_path() {
        let nav = navigation();
        let page = nav.resolve_page("/guide/", &NullPageTitles);
        let SidebarItem::Link(first) = &page.sidebar[0] else {
            panic!("expected link");
        };
        assert_eq!(first.text, "/guide/install/");
    }

    #[test]
    fn test_edit_link_per_locale() {
        let nav = navigation();

        assert_eq!(
            nav.edit_link("/zh-CN/guide/install/"),
            Some(EditLink {
                text: "在Github上编辑此页".to_owned(),
                url: "https://github.com/Casual-UI/vue/edit/main/packages/docs/zh-CN/guide/install/README.md"
                    .to_owned(),
            })
        );
        assert_eq!(
            nav.edit_link("/components/data-presentation/list")
                .map(|link| link.url),
            Some(
                "https://github.com/Casual-UI/vue/edit/main/packages/docs/components/data-presentation/list.md"
                    .to_owned()
            )
        );
    }

    #[test]
    fn test_no_edit_link_without_pattern() {
        let nav = Navigation::from_config(&Config::default()).unwrap();
        assert_eq!(nav.edit_link("/guide/"), None);
    }

    #[test]
    fn test_locale_links_swap_prefix() {
        let nav = navigation();

        let links = nav.locale_links("/zh-CN/guide/install/");

        assert_eq!(
            links,
            vec![
                LocaleLink {
                    text: "English".to_owned(),
                    lang: "en-US".to_owned(),
                    link: "/guide/install/".to_owned(),
                    active: false,
                },
                LocaleLink {
                    text: "简体中文".to_owned(),
                    lang: "zh-CN".to_owned(),
                    link: "/zh-CN/guide/install/".to_owned(),
                    active: true,
                },
            ]
        );
    }

    #[test]
    fn test_search_translations_exact_locale() {
        let mut config = config();
        let mut translations = serde_json::Map::new();
        translations.insert("placeholder".to_owned(), serde_json::json!("搜索"));
        config.plugins.search = Some(SearchPluginConfig {
            app_id: "APP".to_owned(),
            api_key: "key".to_owned(),
            index_name: "docs".to_owned(),
            locales: BTreeMap::from([("/zh-CN/".to_owned(), SearchLocaleConfig { translations })]),
        });
        let nav = Navigation::from_config(&config).unwrap();

        let zh = nav.locale("/zh-CN/");
        assert_eq!(
            nav.search_translations(zh).unwrap()["placeholder"],
            "搜索"
        );
        assert!(nav.search_translations(nav.locale("/")).is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.theme.locales.get_mut("/").unwrap().sidebar.insert(
            "guide/".to_owned(),
            vec![SidebarEntry::Link("/guide/".to_owned())],
        );

        let err = Navigation::from_config(&config).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_resolve_page_is_idempotent() {
        let nav = navigation();
        let first = nav.resolve_page("/components/button/", &NullPageTitles);
        let second = nav.resolve_page("/components/button/", &NullPageTitles);
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolved_page_serialization() {
        let nav = navigation();
        let page = nav.resolve_page("/components/button/", &NullPageTitles);

        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["locale"], "/");
        assert_eq!(json["navbar"][0]["text"], "Guide");
        assert_eq!(json["navbar"][0]["children"][0]["link"], "/guide/install/");
        assert_eq!(json["sidebar"][0]["type"], "section");
        assert_eq!(json["sidebar"][0]["children"][0]["active"], true);
        assert_eq!(json["sidebar_key"], "/components/");
    }
}
