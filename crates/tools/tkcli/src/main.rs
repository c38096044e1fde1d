use clap::Parser;
use tk_requests::prelude::*;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{
    connect, handle_create_ticket, handle_list_tickets, handle_login, handle_profile,
    handle_show_ticket, handle_signup,
};

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let client = connect(&cli.server, cli.token);

    let result = match cli.command {
        Commands::Signup { user, name } => handle_signup(&client, user, name).await,
        Commands::Login { user } => handle_login(&client, user).await,
        Commands::Profile => handle_profile(&client).await,
        Commands::CreateTicket { ticket } => handle_create_ticket(&client, ticket).await,
        Commands::ListTickets => handle_list_tickets(&client).await,
        Commands::ShowTicket { id } => handle_show_ticket(&client, &id).await,
    };

    if let Err(ref e) = result {
        log::error!("Error: {}", e);
    }

    result
}
