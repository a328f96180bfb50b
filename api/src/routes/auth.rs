use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use kitchen_service::Auth;
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{info, warn};

use super::{page_context, render};
use crate::{
    error::AppError,
    session::{safe_next, Session, LOGIN_URL},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_URL, get(login_page).post(login))
        .route("/accounts/logout", post(logout))
}

#[derive(Deserialize)]
struct NextParams {
    next: Option<String>,
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

async fn login_page(
    state: State<AppState>,
    Query(params): Query<NextParams>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&cookies, None);
    ctx.insert("next", safe_next(params.next.as_deref()));
    ctx.insert("username", "");

    render(&state, "login.html.tera", &ctx)
}

async fn login(
    state: State<AppState>,
    mut session: Session,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref());

    match Auth::authenticate(&state.conn, &form.username, &form.password).await? {
        Some(cook) => {
            session.log_in(cook.id);
            info!(cook_id = cook.id, "cook logged in");
            Ok(Redirect::to(next).into_response())
        }
        None => {
            warn!(username = %form.username, "login rejected");
            let mut ctx = page_context(&cookies, None);
            ctx.insert("next", next);
            ctx.insert("username", &form.username);
            ctx.insert(
                "login_error",
                "Please enter a correct username and password. Note that both fields may be case-sensitive.",
            );
            let body = render(&state, "login.html.tera", &ctx)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response())
        }
    }
}

async fn logout(mut session: Session) -> Redirect {
    if let Some(cook_id) = session.cook_id() {
        info!(cook_id, "cook logged out");
    }
    session.clear();
    Redirect::to(LOGIN_URL)
}
