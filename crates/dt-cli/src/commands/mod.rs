//! CLI subcommand implementations.

pub mod check;
pub mod input;
pub mod layout;
pub mod util;
