//! CLI command implementations.

pub(crate) mod call;
pub(crate) mod config;
pub(crate) mod tools;
