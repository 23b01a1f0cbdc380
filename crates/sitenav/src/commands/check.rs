//! `sitenav check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitenav_config::Config;
use sitenav_site::{LocaleBundle, Navigation};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sitenav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails to load or validate.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let navigation = Navigation::from_config(&config)?;

        if let Some(path) = &config.config_path {
            output.highlight(&path.display().to_string());
        }
        for locale in navigation.locales().iter() {
            output.info(&describe_locale(locale));
            if locale.navbar().is_empty() {
                output.warning(&format!("  {} has no navbar", locale.prefix));
            }
        }

        output.success(&format!(
            "Configuration OK: {} locale(s), {} plugin(s)",
            navigation.locales().len(),
            config.plugin_descriptors()?.len()
        ));
        Ok(())
    }
}

fn describe_locale(locale: &LocaleBundle) -> String {
    format!(
        "  {} ({}) navbar: {} item(s), edit links: {}",
        locale.prefix,
        locale.lang,
        locale.navbar().len(),
        if locale.edit_link_pattern.is_some() {
            "on"
        } else {
            "off"
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_describe_locale() {
        let config = Config::from_toml_str(
            r#"
[locales."/zh-CN/"]
lang = "zh-CN"

[theme]
edit_link_pattern = "https://example.com/edit/:branch/:path"

[[theme.locales."/zh-CN/".navbar]]
text = "指南"
link = "/zh-CN/guide/"
"#,
            Path::new("."),
        )
        .unwrap();
        let navigation = Navigation::from_config(&config).unwrap();

        let lines: Vec<_> = navigation.locales().iter().map(describe_locale).collect();

        assert_eq!(
            lines,
            vec![
                "  / (en-US) navbar: 0 item(s), edit links: on",
                "  /zh-CN/ (zh-CN) navbar: 1 item(s), edit links: on",
            ]
        );
    }
}
