//! CLI transport: exposes the core API surface (§4.8) as a subcommand tree.

pub mod commands;
pub mod commands_processor;

pub use commands::Cli;
pub use commands_processor::handle_command;
