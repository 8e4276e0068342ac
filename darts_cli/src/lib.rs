//! Internals of the `darts` command-line scorer.
//!
//! Command parsing, environment configuration and the line-oriented
//! sessions that drive matches, brackets and leagues.

pub mod commands;
pub mod config;
pub mod session;
