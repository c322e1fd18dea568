//! wikisync - push local MediaWiki content to a wiki
//!
//! This crate provides the core functionality for the `wikisync` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Flag / environment / config-file resolution
//! - [`sync`] - Change detection, publishing, watch mode, reporting
//! - [`wiki`] - MediaWiki Action API client
//! - [`error`] - Error types and exit codes

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
pub mod wiki;

pub use error::{Error, Result};
