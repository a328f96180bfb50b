use axum::{extract::State, response::Html, routing::get, Router};
use kitchen_service::Query as QueryCore;
use tower_cookies::Cookies;

use super::{page_context, render};
use crate::{error::AppError, session::Session, AppState};

const NUM_VISITS: &str = "num_visits";

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Record counts plus how often this session has opened the page.
async fn index(
    state: State<AppState>,
    mut session: Session,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let counts = QueryCore::count_all(&state.conn).await?;

    let previous_visits: u64 = session.get(NUM_VISITS).unwrap_or(0);
    let num_visits = previous_visits + 1;
    session.insert(NUM_VISITS, num_visits);

    let user = match session.cook_id() {
        Some(cook_id) => QueryCore::find_cook_by_id(&state.conn, cook_id).await.ok(),
        None => None,
    };

    let mut ctx = page_context(&cookies, user.as_ref());
    ctx.insert("counts", &counts);
    ctx.insert("previous_visits", &previous_visits);
    ctx.insert("num_visits", &num_visits);

    render(&state, "index.html.tera", &ctx)
}
