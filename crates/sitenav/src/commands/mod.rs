//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod plugins;
pub(crate) mod resolve;

pub(crate) use check::CheckArgs;
pub(crate) use plugins::PluginsArgs;
pub(crate) use resolve::ResolveArgs;
