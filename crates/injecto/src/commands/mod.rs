//! CLI command implementations.

pub(crate) mod process;
pub(crate) mod serve;

pub(crate) use process::ProcessArgs;
pub(crate) use serve::ServeArgs;
