//! Command-line front end for tsdoc.
//!
//! - [`cli`] - argument parsing
//! - [`commands`] - the generate pipeline
//! - [`error`] - CLI errors and their `miette` rendering
//! - [`logger`] - `tracing` subscriber setup

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
