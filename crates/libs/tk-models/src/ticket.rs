//! Support ticket model.

use crate::prelude::*;
use crate::{db::connection::DbConnection, schema::tickets::dsl::*};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A support ticket.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TkTicket {
    /// Unique ticket ID.
    pub id: Uuid,
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Status tag, defaults to `open` at the storage layer.
    pub status: String,
    /// The user that opened this ticket.
    pub created_by: Uuid,
    /// When this ticket was created.
    pub created_at: DateTime<Utc>,
    /// When this ticket was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new ticket.
#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::tickets)]
pub struct TkTicketCreate {
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// The user opening the ticket.
    pub created_by: Uuid,
}

/// Mutable ticket fields; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::tickets)]
pub struct TkTicketChanges {
    /// New summary.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status tag.
    pub status: Option<String>,
}

impl TkTicketCreate {
    /// Inserts the ticket.
    pub fn save(self, connection: &DbConnection) -> Result<TkTicket> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::insert_into(tickets)
            .values(self)
            .returning(TkTicket::as_returning())
            .get_result(conn)?)
    }
}

impl TkTicket {
    /// Fetches a ticket by ID.
    pub fn fetch_by_id(target: &Uuid, connection: &DbConnection) -> Result<Self> {
        let conn = &mut connection.pool.get()?;

        Ok(Self::by_id(target)
            .select(TkTicket::as_select())
            .get_result(conn)?)
    }

    /// Fetches all tickets.
    pub fn fetch_all(connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(tickets.select(TkTicket::as_select()).load(conn)?)
    }

    /// Fetches the tickets opened by one user.
    pub fn fetch_by_creator(creator: &Uuid, connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(tickets
            .filter(created_by.eq(creator))
            .select(TkTicket::as_select())
            .load(conn)?)
    }

    /// Applies the given changes to a ticket and returns the updated row.
    pub fn update(
        target: &Uuid,
        changes: TkTicketChanges,
        connection: &DbConnection,
    ) -> Result<Self> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::update(tickets.filter(id.eq(target)))
            .set(changes)
            .returning(TkTicket::as_returning())
            .get_result(conn)?)
    }

    /// Returns a query filtered by ticket ID.
    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_id(target: &Uuid) -> _ {
        crate::schema::tickets::dsl::tickets.filter(id.eq(target))
    }
}
