//! dockhand CLI: manage Docker projects on a remote host as if local.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod namegen;
