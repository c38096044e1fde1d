//! User account model.
//!
//! One record per principal: unique email, salted password hash, optional
//! display name, role and skill tags. The hash never leaves this layer in
//! any outward-facing shape; callers map `TkUser` to public API types.

use crate::prelude::*;
use crate::{db::connection::DbConnection, schema::users::dsl::*};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// A registered user account.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TkUser {
    /// Unique user ID.
    pub id: Uuid,
    /// Login identifier, unique across all users.
    pub email: String,
    /// Salted password hash. Never the plaintext password.
    pub hash: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Role tag, defaults to `user` at the storage layer.
    pub role: String,
    /// Skill tags used for ticket triage.
    pub skills: Vec<String>,
    /// When this user was created.
    pub created_at: DateTime<Utc>,
    /// When this user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct TkUserCreate {
    /// Login identifier.
    pub email: String,
    /// Pre-hashed password.
    pub hash: String,
    /// Optional display name.
    pub name: Option<String>,
}

/// Mutable user fields; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct TkUserChanges {
    /// New role tag.
    pub role: Option<String>,
    /// New skill tags.
    pub skills: Option<Vec<String>>,
}

impl TkUserCreate {
    /// Inserts the user.
    ///
    /// The `users.email` UNIQUE constraint makes concurrent signups with the
    /// same email resolve to exactly one row; the loser surfaces a unique
    /// violation.
    pub fn save(self, connection: &DbConnection) -> Result<TkUser> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::insert_into(users)
            .values(self)
            .returning(TkUser::as_returning())
            .get_result(conn)?)
    }
}

impl TkUser {
    /// Fetches a user by ID.
    pub fn fetch_by_id(target: &Uuid, connection: &DbConnection) -> Result<Self> {
        let conn = &mut connection.pool.get()?;

        Ok(Self::by_id(target)
            .select(TkUser::as_select())
            .get_result(conn)?)
    }

    /// Looks up a user by email, returning `None` when no row matches.
    pub fn find_by_email(target: &str, connection: &DbConnection) -> Result<Option<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(users
            .filter(email.eq(target))
            .select(TkUser::as_select())
            .first(conn)
            .optional()?)
    }

    /// Fetches all users.
    pub fn fetch_all(connection: &DbConnection) -> Result<Vec<Self>> {
        let conn = &mut connection.pool.get()?;

        Ok(users.select(TkUser::as_select()).load(conn)?)
    }

    /// Applies the given changes to a user and returns the updated row.
    pub fn update(
        target: &Uuid,
        changes: TkUserChanges,
        connection: &DbConnection,
    ) -> Result<Self> {
        let conn = &mut connection.pool.get()?;

        Ok(diesel::update(users.filter(id.eq(target)))
            .set(changes)
            .returning(TkUser::as_returning())
            .get_result(conn)?)
    }

    /// Returns a query filtered by user ID.
    #[diesel::dsl::auto_type(no_type_alias)]
    pub fn by_id(target: &Uuid) -> _ {
        crate::schema::users::dsl::users.filter(id.eq(target))
    }
}
