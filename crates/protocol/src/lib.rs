//! Wire types for the dockhand remote-call channel.
//!
//! This crate contains the serde-serializable types exchanged between the
//! local executor and the host-side agent. These types represent the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! The channel carries one request frame per call and one response frame
//! per request. The frame format is internal and need not stay compatible
//! across versions, but must be symmetric between the two ends, which are
//! always shipped together.
//!
//! Types in this crate are pure data: no behavior beyond serialization,
//! deserialization, and frame encoding. Everything that spawns processes or
//! does I/O lives in `dockhand-runtime`.

pub mod call;
pub mod frame;

pub use call::*;
pub use frame::*;
