//! Command-line handlers

pub mod commands;

pub use commands::{cmd_balances, cmd_demo, cmd_tokens, print_checkpoint, CliResult};
