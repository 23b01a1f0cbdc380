//! `sitenav resolve` command implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;
use sitenav_config::{CliSettings, Config};
use sitenav_site::{Navigation, NullPageTitles, PageTitles};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Page path to resolve (e.g. /zh-CN/guide/install/).
    path: String,

    /// Path to configuration file (default: auto-discover sitenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file mapping page paths to page titles.
    #[arg(short, long)]
    titles: Option<PathBuf>,

    /// Repository URL used in edit links (overrides config).
    #[arg(long, env = "SITENAV_REPO")]
    repo: Option<String>,

    /// Branch used in edit links (overrides config).
    #[arg(long)]
    branch: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the titles file cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            repo: self.repo,
            docs_branch: self.branch,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let navigation = Navigation::from_config(&config)?;

        let titles: Box<dyn PageTitles> = match &self.titles {
            Some(path) => Box::new(load_titles(path)?),
            None => Box::new(NullPageTitles),
        };

        let page = navigation.resolve_page(&self.path, titles.as_ref());
        output.json(&page, self.pretty)
    }
}

/// Load a `{"<path>": "<title>"}` JSON file.
fn load_titles(path: &Path) -> Result<HashMap<String, String>, CliError> {
    let content = std::fs::read_to_string(path)?;
    parse_titles(&content)
        .map_err(|e| CliError::Titles(format!("{}: {e}", path.display())))
}

fn parse_titles(content: &str) -> Result<HashMap<String, String>, serde_json::Error> {
    serde_json::from_str(content)
}
