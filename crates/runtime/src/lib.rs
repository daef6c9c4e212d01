//! Remote execution and tunnel lifecycle for dockhand.
//!
//! Two facilities that compose but do not depend on each other:
//!
//! - [`executor`] gives the caller a [`RemoteExecutor`] for a configured
//!   host: either in-process ([`LocalExecutor`]) or across an SSH channel
//!   to a companion agent process ([`SshExecutor`]). Both resolve calls
//!   against the same [`dispatch`] catalogue, so a caller cannot tell the
//!   two apart by success value or by error kind.
//! - [`tunnel`] forwards a local TCP port to the remote Docker control
//!   socket so that host-native tooling can be pointed at
//!   `tcp://localhost:<port>`.

pub mod agent;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod transport;
pub mod tunnel;

pub use config::RemoteConfig;
pub use error::{ExecutorError, TransportError};
pub use executor::{LocalExecutor, RemoteExecutor, SshExecutor, new_executor};
pub use transport::FramedPipe;
pub use tunnel::{SshTunnel, TunnelConfig, TunnelStatus};
