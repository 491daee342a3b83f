//! Command-line front end for cinedex.
//!
//! Parses arguments, loads configuration once and dispatches to the
//! ingestion and push workflows.

pub mod args;
pub mod commands;
pub mod tunnel;

pub use args::{CinedexArgs, Command};
pub use commands::execute_command;
pub use tunnel::{TUNNEL_PORTS, reverse_proxy_command};
