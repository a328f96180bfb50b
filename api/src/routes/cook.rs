use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use kitchen_service::{
    form::{CookCreateForm, CookUpdateForm},
    Mutation as MutationCore, Query as QueryCore, ServiceError,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{empty_errors, form_error, page_context, page_number, render};
use crate::{
    error::AppError,
    flash::{post_response, FlashData},
    forms::RawForm,
    session::CurrentCook,
    AppState,
};

const LIST_URL: &str = "/cooks/";
const FORM_TEMPLATE: &str = "cook_form.html.tera";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_cooks))
        .route("/cooks/create", get(new_cook).post(create_cook))
        .route("/cooks/{id}", get(show_cook))
        .route("/cooks/{id}/update", get(edit_cook).post(update_cook))
        .route("/cooks/{id}/delete", get(confirm_delete_cook).post(delete_cook))
}

#[derive(Deserialize)]
struct Params {
    #[serde(default)]
    username: String,
    page: Option<String>,
}

async fn list_cooks(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Query(params): Query<Params>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let number = page_number(params.page.as_deref())?;
    let page = QueryCore::find_cooks_in_page(&state.conn, &params.username, number).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("page", &page);
    ctx.insert("username", &params.username);

    render(&state, "cook_list.html.tera", &ctx)
}

async fn show_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let detail = QueryCore::find_cook_detail(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("detail", &detail);

    render(&state, "cook_detail.html.tera", &ctx)
}

async fn new_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert(
        "form",
        &CookCreateForm {
            years_of_experience: 2,
            ..Default::default()
        },
    );
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn create_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let (form, errors) = RawForm::from(pairs).cook_create();

    let result = match errors.into_result() {
        Ok(()) => MutationCore::create_cook(&state.conn, form.clone()).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => {
            let data = FlashData::success("Cook successfully added");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn edit_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let cook = QueryCore::find_cook_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("cook", &cook);
    ctx.insert("form", &CookUpdateForm::from(&cook));
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn update_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let cook = QueryCore::find_cook_by_id(&state.conn, id).await?;
    let (form, errors) = RawForm::from(pairs).cook_update();

    let result = match errors.into_result() {
        Ok(()) => MutationCore::update_cook_by_id(&state.conn, id, form.clone()).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => {
            let data = FlashData::success("Cook successfully updated");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err @ ServiceError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("cook", &cook);
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn confirm_delete_cook(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let cook = QueryCore::find_cook_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("object", &cook.to_string());
    ctx.insert("kind", "cook");
    ctx.insert("cancel_url", &format!("/cooks/{id}"));

    render(&state, "confirm_delete.html.tera", &ctx)
}

async fn delete_cook(
    state: State<AppState>,
    CurrentCook(_user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Response, AppError> {
    MutationCore::delete_cook(&state.conn, id).await?;

    let data = FlashData::success("Cook successfully deleted");
    Ok(post_response(&cookies, data, LIST_URL)?.into_response())
}
