//! `sitenav plugins` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use sitenav_config::{BundlerConfig, Config, PluginDescriptor};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the plugins command.
#[derive(Args)]
pub(crate) struct PluginsArgs {
    /// Path to configuration file (default: auto-discover sitenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// Plugin section of the build handed to the site generator.
#[derive(Serialize)]
struct PluginReport<'a> {
    plugins: Vec<PluginDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundler: Option<&'a BundlerConfig>,
}

impl PluginsArgs {
    /// Execute the plugins command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails to load.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let report = report(&config)?;
        tracing::info!(plugins = report.plugins.len(), "Collected plugin descriptors");
        output.json(&report, self.pretty)
    }
}

fn report(config: &Config) -> Result<PluginReport<'_>, CliError> {
    Ok(PluginReport {
        plugins: config.plugin_descriptors()?,
        bundler: config.bundler.as_ref(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_report_lists_plugins_in_order() {
        let config = Config::from_toml_str(
            r#"
[plugins.analytics]
id = "G-4H4K4S0QTD"

[plugins.highlighter]
theme = "nord"

[bundler]
css_presets = ["uno"]
"#,
            Path::new("/docs"),
        )
        .unwrap();

        let json = serde_json::to_value(report(&config).unwrap()).unwrap();

        assert_eq!(json["plugins"][0]["name"], "highlighter");
        assert_eq!(json["plugins"][0]["options"]["theme"], "nord");
        assert_eq!(json["plugins"][1]["name"], "analytics");
        assert_eq!(json["bundler"]["css_presets"][0], "uno");
    }

    #[test]
    fn test_report_without_bundler() {
        let config = Config::from_toml_str("", Path::new(".")).unwrap();

        let json = serde_json::to_value(report(&config).unwrap()).unwrap();

        assert_eq!(json, serde_json::json!({"plugins": []}));
    }
}
