//! CLI module
//!
//! A single `serve` subcommand runs the HTTP service.

pub mod serve;

use clap::{Parser, Subcommand};

/// User account microservice with JWT-based authentication
#[derive(Parser)]
#[command(name = "usuarios-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
