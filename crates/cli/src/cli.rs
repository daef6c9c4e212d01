use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dockhand")]
#[command(about = "Drive Docker projects on a remote host as if they were local")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project and attach this directory to it
    New {
        /// The project name (a random one is generated when omitted)
        name: Option<String>,
        /// The host to create the project on ([user@]host)
        host: Option<String>,
    },

    /// Attach this directory to an existing project
    Connect {
        /// The existing project's name
        name: String,
        /// The host of the project ([user@]host)
        host: Option<String>,
    },

    /// List all projects on the configured host
    Ls,

    /// Delete a project and its whole directory tree
    Rm {
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
        /// The project name (defaults to the attached project)
        name: Option<String>,
    },

    /// Show the attached project and the configured remote
    Info,

    /// Forward a local port to the remote Docker daemon until interrupted
    Tunnel {
        /// Local port for the forward
        #[arg(long)]
        local_port: Option<u16>,
    },

    /// Show or set the default remote ([user@]host)
    Remote {
        /// The new default remote; prints the current one when omitted
        target: Option<String>,
    },

    /// Print a random project name
    Name,

    /// Serve registry operations over stdin/stdout (run by the remote end)
    #[command(hide = true)]
    Agent {
        /// Project root directory (defaults to the configured or home dir)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}
