//! HTTP API surface of the daemon.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use tk_sdk::{
    ticket::{TkTicketApi, TkTicketPost, TkTicketStatusUpdate, TkTicketUpdate},
    user::{
        TkLoginRequest, TkSignupRequest, TkUserCreated, TkUserLogin, TkUserProfile,
        TkUserUpdateRequest,
    },
};
use tk_web::{
    ctx::{Ctx, resolver::{login_user, mw_ctx_resolver}},
    mw_auth::mw_require_auth,
    ticket::{create_ticket, fetch_ticket, list_tickets, update_ticket, update_ticket_status},
    user::{create_user, fetch_profile, list_users, update_user},
};
use tokio::task::JoinHandle;
use tower_cookies::{CookieManagerLayer, Cookies};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use uuid::Uuid;

use tk_models::db::connection::DbConnection;
use tk_web::prelude::Result as TkWebResult;

use crate::events::{EventBus, TkEvent};
use crate::prelude::*;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub connection: DbConnection,
    /// Event pipeline handle.
    pub events: EventBus,
}

fn v1(path: &str) -> String {
    format!("/v1/{path}")
}

pub async fn setup_api(state: AppState) -> Result<JoinHandle<Result<()>>> {
    let auth_routes = Router::new()
        .route(&v1("signup"), post(signup))
        .route(&v1("login"), post(login));

    let user_routes = Router::new()
        .route(&v1("users"), get(get_users))
        .route(&v1("users/profile"), get(get_profile))
        .route(&v1("users/update"), post(post_update_user))
        .route_layer(middleware::from_fn(mw_require_auth));

    let ticket_routes = Router::new()
        .route(&v1("tickets"), post(post_ticket).get(get_tickets))
        .route(&v1("tickets/{id}"), get(get_ticket).put(put_ticket))
        .route(&v1("tickets/{id}/status"), put(put_ticket_status))
        .route_layer(middleware::from_fn(mw_require_auth));

    let app = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(ticket_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(mw_ctx_resolver))
        .layer(CookieManagerLayer::new())
        .with_state(state);

    let addr = std::env::var("TKD_ADDR").unwrap_or_else(|_| String::from("127.0.0.1:3000"));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::debug!("listening on {:?}", listener.local_addr());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    Ok(handle)
}

async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<TkSignupRequest>,
) -> TkWebResult<(StatusCode, Json<TkUserCreated>)> {
    let email = payload.email.clone();
    let created = create_user(payload, &state.connection)?;
    state.events.publish(TkEvent::UserSignedUp {
        user_id: created.user_id,
        email,
    });
    Ok((StatusCode::CREATED, Json(created)))
}

async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<TkLoginRequest>,
) -> TkWebResult<Json<TkUserLogin>> {
    Ok(Json(login_user(&payload, &state.connection, &cookies)?))
}

async fn get_profile(State(state): State<AppState>, ctx: Ctx) -> TkWebResult<Json<TkUserProfile>> {
    Ok(Json(fetch_profile(&ctx, &state.connection)?))
}

async fn get_users(
    State(state): State<AppState>,
    ctx: Ctx,
) -> TkWebResult<Json<Vec<TkUserProfile>>> {
    Ok(Json(list_users(&ctx, &state.connection)?))
}

async fn post_update_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(payload): Json<TkUserUpdateRequest>,
) -> TkWebResult<Json<TkUserProfile>> {
    Ok(Json(update_user(&ctx, payload, &state.connection)?))
}

async fn post_ticket(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(payload): Json<TkTicketPost>,
) -> TkWebResult<(StatusCode, Json<TkTicketApi>)> {
    let ticket = create_ticket(&ctx, payload, &state.connection)?;
    state.events.publish(TkEvent::TicketCreated {
        ticket_id: ticket.id,
        created_by: ticket.created_by,
    });
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn get_tickets(
    State(state): State<AppState>,
    ctx: Ctx,
) -> TkWebResult<Json<Vec<TkTicketApi>>> {
    Ok(Json(list_tickets(&ctx, &state.connection)?))
}

async fn get_ticket(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<Uuid>,
) -> TkWebResult<Json<TkTicketApi>> {
    Ok(Json(fetch_ticket(&ctx, &id, &state.connection)?))
}

async fn put_ticket(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<Uuid>,
    Json(payload): Json<TkTicketUpdate>,
) -> TkWebResult<Json<TkTicketApi>> {
    Ok(Json(update_ticket(&ctx, &id, payload, &state.connection)?))
}

async fn put_ticket_status(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<Uuid>,
    Json(payload): Json<TkTicketStatusUpdate>,
) -> TkWebResult<Json<TkTicketApi>> {
    Ok(Json(update_ticket_status(
        &ctx,
        &id,
        payload,
        &state.connection,
    )?))
}
