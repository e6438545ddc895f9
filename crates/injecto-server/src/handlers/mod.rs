//! HTTP request handlers.

pub(crate) mod health;
pub(crate) mod process;
pub(crate) mod upload;
