//! User management: signup, profile, and admin updates.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tk_auth::secret_hash::generate_secret_hash;
use tk_models::{
    db::connection::DbConnection,
    user::{TkUser, TkUserChanges, TkUserCreate},
};
use tk_sdk::user::{TkRole, TkSignupRequest, TkUserApi, TkUserCreated, TkUserProfile, TkUserUpdateRequest};
use uuid::Uuid;

use crate::ctx::Ctx;
use crate::prelude::*;

impl From<TkUser> for W<TkUserApi> {
    fn from(value: TkUser) -> Self {
        Self(TkUserApi {
            id: value.id,
            email: value.email,
            name: value.name,
        })
    }
}

impl From<TkUser> for W<TkUserProfile> {
    fn from(value: TkUser) -> Self {
        Self(TkUserProfile {
            id: value.id,
            email: value.email,
            name: value.name,
            role: TkRole::parse(&value.role).unwrap_or(TkRole::User),
            skills: value.skills,
        })
    }
}

/// Creates a new user from a signup payload.
///
/// The password is hashed before anything is stored; the plaintext never
/// leaves this function. The pre-check answers the common duplicate case,
/// and a unique violation from the store covers two signups racing past it.
/// No token is issued on this path; sessions start at login.
pub fn create_user(payload: TkSignupRequest, connection: &DbConnection) -> Result<TkUserCreated> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(Error::MissingCredentials);
    }
    if TkUser::find_by_email(&payload.email, connection)?.is_some() {
        return Err(Error::UserAlreadyExists);
    }

    let hash = generate_secret_hash(&payload.password)?;
    let model = TkUserCreate {
        email: payload.email,
        hash,
        name: payload.name,
    };
    let user = model.save(connection).map_err(|err| match err {
        tk_models::error::Error::Diesel(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _,
        )) => Error::UserAlreadyExists,
        other => Error::Models(other),
    })?;

    Ok(TkUserCreated {
        message: String::from("User created"),
        user_id: user.id,
        token: None,
    })
}

/// Returns the caller's own profile.
pub fn fetch_profile(ctx: &Ctx, connection: &DbConnection) -> Result<TkUserProfile> {
    let user = fetch_user(&ctx.user_id, connection)?;
    Ok(W::<TkUserProfile>::from(user).0)
}

/// Lists all users. Admin only.
pub fn list_users(ctx: &Ctx, connection: &DbConnection) -> Result<Vec<TkUserProfile>> {
    require_admin(ctx, connection)?;
    Ok(TkUser::fetch_all(connection)?
        .into_iter()
        .map(|user| W::<TkUserProfile>::from(user).0)
        .collect())
}

/// Sets role and/or skills of a target user. Admin only.
pub fn update_user(
    ctx: &Ctx,
    payload: TkUserUpdateRequest,
    connection: &DbConnection,
) -> Result<TkUserProfile> {
    require_admin(ctx, connection)?;

    let changes = TkUserChanges {
        role: payload.role.map(|role| String::from(role.as_str())),
        skills: payload.skills,
    };

    // An empty changeset is not an update; diesel rejects it.
    let user = if changes.role.is_none() && changes.skills.is_none() {
        fetch_user(&payload.user_id, connection)?
    } else {
        TkUser::update(&payload.user_id, changes, connection).map_err(not_found_as_user)?
    };

    Ok(W::<TkUserProfile>::from(user).0)
}

/// Whether a user record carries the admin role.
pub fn is_admin(user: &TkUser) -> bool {
    user.role == TkRole::Admin.as_str()
}

/// Resolves the caller and rejects non-admins.
pub fn require_admin(ctx: &Ctx, connection: &DbConnection) -> Result<TkUser> {
    let user = fetch_user(&ctx.user_id, connection)?;
    if !is_admin(&user) {
        return Err(Error::ApiForbidden);
    }
    Ok(user)
}

/// Fetches a user, mapping an absent row to the API-level not-found error.
pub fn fetch_user(target: &Uuid, connection: &DbConnection) -> Result<TkUser> {
    TkUser::fetch_by_id(target, connection).map_err(not_found_as_user)
}

fn not_found_as_user(err: tk_models::error::Error) -> Error {
    match err {
        tk_models::error::Error::Diesel(DieselError::NotFound) => Error::UserNotFound,
        other => Error::Models(other),
    }
}
