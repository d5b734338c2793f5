//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the MCP server on stdio (default)
//! - tools: list the registered tools
//! - call: invoke one tool in-process

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kvault - Knowledge Vault MCP server
#[derive(Parser, Debug)]
#[command(name = "kvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server on stdin/stdout
    Serve,

    /// List available tools
    Tools {
        /// Print the full listing with input schemas as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call a tool once and print its result
    Call {
        /// Tool name
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long)]
        args: Option<String>,
    },
}
