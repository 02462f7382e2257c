//! Shared application services: configuration and logging bootstrap.
//!
//! Every other crate in the workspace reads its settings from [`config::Config`]
//! and logs through the global logger initialized by [`logging::Logger`].

pub mod config;
pub mod logging;
