//! Command-line interface definitions for tkcli.

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Ticket-Desk command line client.
#[derive(Parser)]
#[command(name = "tkc")]
#[command(about = "Ticket-Desk CLI - talk to a tkd server from the terminal")]
pub struct Cli {
    /// Server url
    #[arg(short, long, default_value = "http://localhost:3000")]
    pub server: String,

    /// Session token (defaults to the TK_TOKEN environment variable)
    #[arg(short, long)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Signup {
        #[command(flatten)]
        user: UserArgs,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Log in and print the session token
    Login {
        #[command(flatten)]
        user: UserArgs,
    },

    /// Show the profile of the logged-in user
    Profile,

    /// Open a new ticket
    CreateTicket {
        #[command(flatten)]
        ticket: TicketArgs,
    },

    /// List the tickets visible to the logged-in user
    ListTickets,

    /// Show one ticket
    ShowTicket {
        /// Ticket id
        #[arg(long)]
        id: Uuid,
    },
}

/// Credentials for signup and login.
#[derive(Args)]
pub struct UserArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    /// Recommended to keep this empty and set it when prompted
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for opening a ticket.
#[derive(Args)]
pub struct TicketArgs {
    /// Short summary
    #[arg(long)]
    pub title: String,

    /// Full problem description
    #[arg(long)]
    pub description: String,
}
