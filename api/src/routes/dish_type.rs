use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use kitchen_service::{form::DishTypeForm, Mutation as MutationCore, Query as QueryCore, ServiceError};
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

const LIST_URL: &str = "/dish-types/";
const FORM_TEMPLATE: &str = "dish_type_form.html.tera";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_dish_types))
        .route("/dish-types/create", get(new_dish_type).post(create_dish_type))
        .route("/dish-types/{id}/update", get(edit_dish_type).post(update_dish_type))
        .route("/dish-types/{id}/delete", get(confirm_delete_dish_type).post(delete_dish_type))
}

#[derive(Deserialize)]
struct Params {
    #[serde(default)]
    name: String,
    page: Option<String>,
}

async fn list_dish_types(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Query(params): Query<Params>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let number = page_number(params.page.as_deref())?;
    let page = QueryCore::find_dish_types_in_page(&state.conn, &params.name, number).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("page", &page);
    ctx.insert("name", &params.name);

    render(&state, "dish_type_list.html.tera", &ctx)
}

async fn new_dish_type(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("form", &DishTypeForm::default());
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn create_dish_type(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = RawForm::from(pairs).dish_type();

    match MutationCore::create_dish_type(&state.conn, form.clone()).await {
        Ok(_) => {
            let data = FlashData::success("Dish type successfully added");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn edit_dish_type(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let dish_type = QueryCore::find_dish_type_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("dish_type", &dish_type);
    ctx.insert("form", &DishTypeForm::from(&dish_type));
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn update_dish_type(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = RawForm::from(pairs).dish_type();

    match MutationCore::update_dish_type_by_id(&state.conn, id, form.clone()).await {
        Ok(_) => {
            let data = FlashData::success("Dish type successfully updated");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err @ ServiceError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            let dish_type = QueryCore::find_dish_type_by_id(&state.conn, id).await?;
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("dish_type", &dish_type);
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn confirm_delete_dish_type(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let dish_type = QueryCore::find_dish_type_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("object", &dish_type.to_string());
    ctx.insert("kind", "dish type");
    ctx.insert("warning", "Every dish of this type will be deleted as well.");
    ctx.insert("cancel_url", LIST_URL);

    render(&state, "confirm_delete.html.tera", &ctx)
}

async fn delete_dish_type(
    state: State<AppState>,
    CurrentCook(_user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Response, AppError> {
    MutationCore::delete_dish_type(&state.conn, id).await?;

    let data = FlashData::success("Dish type successfully deleted");
    Ok(post_response(&cookies, data, LIST_URL)?.into_response())
}
