//! Cable routing CLI library.
//!
//! Rendering and terminal helpers shared by the `cableroute` binary's
//! subcommands.

pub mod output;
pub mod terminal;
