use tk_requests::{ApiClient, prelude::*};
use tk_sdk::{
    ticket::TkTicketPost,
    user::{TkLoginRequest, TkSignupRequest},
};
use uuid::Uuid;

use crate::cli::{TicketArgs, UserArgs};

/// Builds a client for the server, seeding the session from an explicit
/// token or the TK_TOKEN environment variable.
pub fn connect(server: &str, token: Option<String>) -> ApiClient {
    let client = ApiClient::new(format!("{server}/v1"))
        .on_auth_failure(|| log::warn!("Session expired or rejected, log in again"));
    if let Some(token) = token.or_else(|| std::env::var("TK_TOKEN").ok()) {
        client.session().set_token(token);
    }
    client
}

fn prompt_password(password: Option<String>) -> String {
    password.unwrap_or_else(|| {
        rpassword::prompt_password("Password > ").expect("Failed to get password")
    })
}

pub async fn handle_signup(client: &ApiClient, args: UserArgs, name: Option<String>) -> Result<()> {
    let password = prompt_password(args.password);
    let created = client
        .signup(&TkSignupRequest {
            email: args.email,
            password,
            name,
        })
        .await?;
    println!("{} (id: {})", created.message, created.user_id);
    Ok(())
}

pub async fn handle_login(client: &ApiClient, args: UserArgs) -> Result<()> {
    let password = prompt_password(args.password);
    let login = client
        .login(&TkLoginRequest::new(args.email, password))
        .await?;

    println!("Logged in as {}", login.user);
    println!("export TK_TOKEN={}", login.token);
    Ok(())
}

pub async fn handle_profile(client: &ApiClient) -> Result<()> {
    let profile = client.profile().await?;
    println!(
        "{} <{}> role={} skills=[{}]",
        profile.name.as_deref().unwrap_or("(unnamed)"),
        profile.email,
        profile.role,
        profile.skills.join(", ")
    );
    Ok(())
}

pub async fn handle_create_ticket(client: &ApiClient, args: TicketArgs) -> Result<()> {
    let ticket = client
        .create_ticket(&TkTicketPost {
            title: args.title,
            description: args.description,
        })
        .await?;
    println!("Created {ticket}");
    Ok(())
}

pub async fn handle_list_tickets(client: &ApiClient) -> Result<()> {
    let tickets = client.tickets().await?;
    if tickets.is_empty() {
        println!("No tickets");
    }
    for ticket in tickets {
        println!("{ticket}");
    }
    Ok(())
}

pub async fn handle_show_ticket(client: &ApiClient, id: &Uuid) -> Result<()> {
    let ticket = client.ticket(id).await?;
    println!("{ticket}");
    println!("{}", ticket.description);
    Ok(())
}
