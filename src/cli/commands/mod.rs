//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which owns the
//! [`FeatureDetector`](crate::detector::FeatureDetector) built from the
//! global flags and routes each subcommand to its implementation.

pub mod clear;
pub mod detect;
pub mod dispatcher;
pub mod display;
pub mod snapshot;

pub use dispatcher::{resolve_config, Command, CommandDispatcher, CommandResult};
