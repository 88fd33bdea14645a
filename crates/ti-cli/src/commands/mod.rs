//! CLI subcommand implementations.

pub mod aggregate;
pub mod buckets;
pub mod util;
