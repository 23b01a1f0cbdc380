//! `${VAR}` and `${VAR:-default}` expansion for secrets and URLs.
//!
//! Values without `${` are returned unchanged, so a bare `$` survives.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `field` names the config key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |name: &str| -> Result<Option<Cow<'static, str>>, UnsetVar> {
        std::env::var(name)
            .map(|val| Some(Cow::Owned(val)))
            .map_err(|_| UnsetVar(name.to_owned()))
    };

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Expand an optional field in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

/// Name of a variable that was referenced but not set.
struct UnsetVar(String);
