//! Host shell execution.
//!
//! Commands the interpreter does not implement itself are handed to the host
//! shell through the narrow [`HostShell`] capability, so the passthrough can
//! be swapped out or disabled entirely in a sandboxed build.

mod passthrough;

pub use passthrough::{DisabledShell, HostOutput, HostShell, SystemShell, DEFAULT_SHELL};
