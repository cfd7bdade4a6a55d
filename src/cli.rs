use crate::telemetry::LogTarget;
use clap::{Parser, Subcommand};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Parser)]
#[command(name = "mern_demo_api")]
#[command(about = "MERN demo backend server and terminal dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(about = "Connect to MongoDB and start the API server")]
    Serve,
    #[command(about = "Fetch and display the backend welcome message and health")]
    Dashboard {
        #[arg(long, default_value = DEFAULT_BACKEND_URL)]
        base_url: String,
    },
}

impl Command {
    /// The dashboard prints its view to stdout, so its logs go to stderr.
    pub fn log_target(&self) -> LogTarget {
        match self {
            Command::Serve => LogTarget::Stdout,
            Command::Dashboard { .. } => LogTarget::Stderr,
        }
    }
}

pub fn print_usage() {
    println!("Usage: mern_demo_api <command>");
    println!();
    println!("Commands:");
    println!("  serve        Connect to MongoDB and start the API server");
    println!("  dashboard    Show the backend welcome message and health");
    println!();
    println!("Run 'mern_demo_api <command> --help' for more information on a command.");
}
