//! Ticket handler cores: create, list, fetch and update.
//!
//! Visibility rule: a ticket belongs to its creator; admins see everything.
//! A ticket outside the caller's view answers not-found, never forbidden,
//! so ticket IDs leak nothing.

use diesel::result::Error as DieselError;
use tk_models::{
    db::connection::DbConnection,
    ticket::{TkTicket, TkTicketChanges, TkTicketCreate},
};
use tk_sdk::ticket::{
    TkTicketApi, TkTicketPost, TkTicketStatus, TkTicketStatusUpdate, TkTicketUpdate,
};
use uuid::Uuid;

use crate::ctx::Ctx;
use crate::prelude::*;
use crate::user::{fetch_user, is_admin};

impl From<TkTicket> for W<TkTicketApi> {
    fn from(value: TkTicket) -> Self {
        Self(TkTicketApi {
            id: value.id,
            title: value.title,
            description: value.description,
            status: TkTicketStatus::parse(&value.status).unwrap_or(TkTicketStatus::Open),
            created_by: value.created_by,
            created_at: value.created_at,
        })
    }
}

/// Creates a ticket owned by the caller.
pub fn create_ticket(
    ctx: &Ctx,
    payload: TkTicketPost,
    connection: &DbConnection,
) -> Result<TkTicketApi> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(Error::InvalidTicketInput);
    }

    let model = TkTicketCreate {
        title: payload.title,
        description: payload.description,
        created_by: ctx.user_id,
    };
    let ticket = model.save(connection)?;
    Ok(W::<TkTicketApi>::from(ticket).0)
}

/// Lists the tickets visible to the caller.
pub fn list_tickets(ctx: &Ctx, connection: &DbConnection) -> Result<Vec<TkTicketApi>> {
    let user = fetch_user(&ctx.user_id, connection)?;
    let tickets = if is_admin(&user) {
        TkTicket::fetch_all(connection)?
    } else {
        TkTicket::fetch_by_creator(&ctx.user_id, connection)?
    };

    Ok(tickets
        .into_iter()
        .map(|ticket| W::<TkTicketApi>::from(ticket).0)
        .collect())
}

/// Fetches one ticket visible to the caller.
pub fn fetch_ticket(ctx: &Ctx, target: &Uuid, connection: &DbConnection) -> Result<TkTicketApi> {
    let ticket = fetch_visible(ctx, target, connection)?;
    Ok(W::<TkTicketApi>::from(ticket).0)
}

/// Updates title and description of a ticket visible to the caller.
pub fn update_ticket(
    ctx: &Ctx,
    target: &Uuid,
    payload: TkTicketUpdate,
    connection: &DbConnection,
) -> Result<TkTicketApi> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(Error::InvalidTicketInput);
    }
    fetch_visible(ctx, target, connection)?;

    let changes = TkTicketChanges {
        title: Some(payload.title),
        description: Some(payload.description),
        status: None,
    };
    let ticket = TkTicket::update(target, changes, connection)?;
    Ok(W::<TkTicketApi>::from(ticket).0)
}

/// Updates the status of a ticket visible to the caller.
pub fn update_ticket_status(
    ctx: &Ctx,
    target: &Uuid,
    payload: TkTicketStatusUpdate,
    connection: &DbConnection,
) -> Result<TkTicketApi> {
    fetch_visible(ctx, target, connection)?;

    let changes = TkTicketChanges {
        title: None,
        description: None,
        status: Some(String::from(payload.status.as_str())),
    };
    let ticket = TkTicket::update(target, changes, connection)?;
    Ok(W::<TkTicketApi>::from(ticket).0)
}

fn fetch_visible(ctx: &Ctx, target: &Uuid, connection: &DbConnection) -> Result<TkTicket> {
    let ticket = TkTicket::fetch_by_id(target, connection).map_err(|err| match err {
        tk_models::error::Error::Diesel(DieselError::NotFound) => Error::TicketNotFound,
        other => Error::Models(other),
    })?;

    if ticket.created_by != ctx.user_id {
        let user = fetch_user(&ctx.user_id, connection)?;
        if !is_admin(&user) {
            return Err(Error::TicketNotFound);
        }
    }
    Ok(ticket)
}
