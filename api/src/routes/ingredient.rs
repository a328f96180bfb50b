use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use kitchen_service::{form::IngredientForm, Mutation as MutationCore, Query as QueryCore, ServiceError};
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

const LIST_URL: &str = "/ingredients/";
const FORM_TEMPLATE: &str = "ingredient_form.html.tera";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_ingredients))
        .route("/ingredients/create", get(new_ingredient).post(create_ingredient))
        .route("/ingredients/{id}/update", get(edit_ingredient).post(update_ingredient))
        .route("/ingredients/{id}/delete", get(confirm_delete_ingredient).post(delete_ingredient))
}

#[derive(Deserialize)]
struct Params {
    page: Option<String>,
}

async fn list_ingredients(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Query(params): Query<Params>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let number = page_number(params.page.as_deref())?;
    let page = QueryCore::find_ingredients_in_page(&state.conn, number).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("page", &page);

    render(&state, "ingredient_list.html.tera", &ctx)
}

async fn new_ingredient(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("form", &IngredientForm::default());
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn create_ingredient(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = RawForm::from(pairs).ingredient();

    match MutationCore::create_ingredient(&state.conn, form.clone()).await {
        Ok(_) => {
            let data = FlashData::success("Ingredient successfully added");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn edit_ingredient(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let ingredient = QueryCore::find_ingredient_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("ingredient", &ingredient);
    ctx.insert("form", &IngredientForm::from(&ingredient));
    empty_errors(&mut ctx);

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn update_ingredient(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = RawForm::from(pairs).ingredient();

    match MutationCore::update_ingredient_by_id(&state.conn, id, form.clone()).await {
        Ok(_) => {
            let data = FlashData::success("Ingredient successfully updated");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err @ ServiceError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            let ingredient = QueryCore::find_ingredient_by_id(&state.conn, id).await?;
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("ingredient", &ingredient);
            ctx.insert("form", &form);
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn confirm_delete_ingredient(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let ingredient = QueryCore::find_ingredient_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("object", &ingredient.to_string());
    ctx.insert("kind", "ingredient");
    ctx.insert("cancel_url", LIST_URL);

    render(&state, "confirm_delete.html.tera", &ctx)
}

async fn delete_ingredient(
    state: State<AppState>,
    CurrentCook(_user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Response, AppError> {
    MutationCore::delete_ingredient(&state.conn, id).await?;

    let data = FlashData::success("Ingredient successfully deleted");
    Ok(post_response(&cookies, data, LIST_URL)?.into_response())
}
