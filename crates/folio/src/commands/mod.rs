//! CLI command implementations.

pub(crate) mod extract;
pub(crate) mod filter;

pub(crate) use extract::ExtractArgs;
pub(crate) use filter::FilterArgs;
