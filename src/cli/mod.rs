//! CLI module for the CodeScape backend
//!
//! Provides subcommands:
//! - `serve`: run the registration API
//! - `register`: sign up from the terminal through the page controller

pub mod register;
pub mod serve;

use clap::{Parser, Subcommand};

/// CodeScape backend - event registration API
#[derive(Parser)]
#[command(name = "codescape-backend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the registration API (default)
    Serve,

    /// Register a participant the way the sign-up page does
    Register(register::RegisterArgs),
}
