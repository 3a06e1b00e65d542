//! CLI module - maintenance commands and the web server entry point
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Watchlist - a small movie watchlist served over HTTP
#[derive(Parser)]
#[command(name = "watchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve,

    /// Create the database schema
    Initdb {
        /// Drop every existing table first
        #[arg(long)]
        drop: bool,
    },

    /// Fill the database with a demo user and ten movies
    Forge,

    /// Create or update the admin login
    Admin {
        /// Login handle (prompted for when omitted)
        #[arg(long)]
        username: Option<String>,
        /// Password (prompted for twice when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
