//! CLI module for meshfield
//!
//! Provides command-line interface for:
//! - encode: register a field on a mesh entity in a file store
//! - inspect: print decoded fields and their component names
//! - types: list known field types

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, EncodeArgs, InspectArgs};
pub use commands::{encode, inspect, run, run_command, types};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
