//! Theme configuration: navbar, sidebar and UI strings.
//!
//! ```toml
//! [theme]
//! logo = "/logo.png"
//! repo = "https://github.com/Casual-UI/vue"
//! edit_link_pattern = ":repo/edit/:branch/packages/docs/:path"
//!
//! [[theme.locales."/".navbar]]
//! text = "Guide"
//! children = [{ text = "Install", link = "/guide/install/" }]
//!
//! [theme.locales."/".sidebar]
//! "/guide/" = ["/guide/install/", "/guide/dark-mode/"]
//! "/components/" = [
//!     { text = "Basic", collapsible = true, children = ["/components/button/"] },
//! ]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Theme-wide options.
///
/// Every field except `locales` acts as the default for locales that do
/// not override it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Logo image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Logo image path used in dark mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_dark: Option<String>,
    /// Repository URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Label of the repository link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_label: Option<String>,
    /// Edit link pattern with `:repo`, `:branch` and `:path` placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link_pattern: Option<String>,
    /// Branch used in edit links (default: `main`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_branch: Option<String>,
    /// Default UI strings.
    pub strings: ThemeStrings,
    /// Per-locale theme options keyed by locale prefix.
    pub locales: BTreeMap<String, ThemeLocaleConfig>,
}

/// Theme options for a single locale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeLocaleConfig {
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
    /// UI strings for this locale.
    pub strings: ThemeStrings,
    /// Ordered navbar items.
    pub navbar: Vec<NavbarItem>,
    /// Sidebar entries keyed by path prefix.
    pub sidebar: BTreeMap<String, Vec<SidebarEntry>>,
}

/// Translatable theme UI strings. Unset strings fall back to the
/// theme-wide value, then to the built-in English text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeStrings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_language_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_language_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributors_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link_text: Option<String>,
}

impl ThemeStrings {
    /// Fill unset strings from `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &Self) -> Self {
        let pick = |own: Option<&String>, other: Option<&String>| own.or(other).cloned();
        Self {
            select_language_text: pick(
                self.select_language_text.as_ref(),
                fallback.select_language_text.as_ref(),
            ),
            select_language_name: pick(
                self.select_language_name.as_ref(),
                fallback.select_language_name.as_ref(),
            ),
            tip: pick(self.tip.as_ref(), fallback.tip.as_ref()),
            warning: pick(self.warning.as_ref(), fallback.warning.as_ref()),
            danger: pick(self.danger.as_ref(), fallback.danger.as_ref()),
            contributors_text: pick(
                self.contributors_text.as_ref(),
                fallback.contributors_text.as_ref(),
            ),
            last_updated_text: pick(
                self.last_updated_text.as_ref(),
                fallback.last_updated_text.as_ref(),
            ),
            edit_link_text: pick(self.edit_link_text.as_ref(), fallback.edit_link_text.as_ref()),
        }
    }
}

/// Top-level navbar entry.
///
/// Groups hold links only, so the navbar is at most two levels deep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavbarItem {
    /// Expandable menu of links.
    Group(NavbarGroup),
    /// Direct link.
    Link(NavbarLink),
}

impl NavbarItem {
    /// Display label.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Group(group) => &group.text,
            Self::Link(link) => &link.text,
        }
    }
}

/// Navbar link to a site path or external URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavbarLink {
    pub text: String,
    pub link: String,
}

/// Navbar menu with one level of links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavbarGroup {
    pub text: String,
    pub children: Vec<NavbarLink>,
}

/// Sidebar entry under a path prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SidebarEntry {
    /// Page path; the title comes from the page itself.
    Link(String),
    /// Labeled group of page paths.
    Section(SidebarSection),
}

impl SidebarEntry {
    /// All page paths referenced by this entry, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        let paths: &[String] = match self {
            Self::Link(path) => std::slice::from_ref(path),
            Self::Section(section) => &section.children,
        };
        paths.iter().map(String::as_str)
    }
}

/// Labeled sidebar section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SidebarSection {
    pub text: String,
    #[serde(default)]
    pub collapsible: bool,
    pub children: Vec<String>,
}
