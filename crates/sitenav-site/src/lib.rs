//! Locale, navbar and sidebar resolution for sitenav.
//!
//! This crate provides:
//! - [`Navigation`]: immutable per-page navigation lookups
//! - [`LocaleTable`] / [`LocaleBundle`]: merged per-locale settings
//! - Sidebar rendering with page titles from a [`PageTitles`] source
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use sitenav_config::Config;
//! use sitenav_site::{Navigation, NullPageTitles};
//!
//! let config = Config::from_toml_str(
//!     r#"
//! [locales."/"]
//! lang = "en-US"
//!
//! [locales."/zh-CN/"]
//! lang = "zh-CN"
//!
//! [theme.locales."/zh-CN/".sidebar]
//! "/zh-CN/guide/" = ["/zh-CN/guide/install/"]
//! "#,
//!     Path::new("."),
//! )?;
//! let nav = Navigation::from_config(&config)?;
//!
//! let page = nav.resolve_page("/zh-CN/guide/install/", &NullPageTitles);
//! assert_eq!(page.locale, "/zh-CN/");
//! assert_eq!(page.sidebar.len(), 1);
//! # Ok(())
//! # }
//! ```

mod edit_link;
mod locale;
mod navigation;
mod prefix;

pub use locale::{LocaleBundle, LocaleTable, UiStrings};
pub use navigation::{
    EditLink, LocaleLink, Navigation, NullPageTitles, PageTitles, ResolvedPage, SidebarItem,
    SidebarLink, SidebarSectionView, render_sidebar,
};

// Re-export configuration types that appear in resolver output
pub use sitenav_config::{NavbarGroup, NavbarItem, NavbarLink, SidebarEntry, SidebarSection};
