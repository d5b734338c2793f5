//! CLI module for kvault - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for serving over stdio,
//! listing tools, and one-off tool calls.

pub mod commands;

pub use commands::Cli;
