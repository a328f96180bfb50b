use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use kitchen_service::{
    form::DishForm, Assignment, Mutation as MutationCore, Query as QueryCore, ServiceError,
};
use serde::Deserialize;
use tera::Context;
use tower_cookies::Cookies;

use super::{empty_errors, form_error, page_context, page_number, render};
use crate::{
    error::AppError,
    flash::{post_response, FlashData},
    forms::RawForm,
    session::CurrentCook,
    AppState,
};

const LIST_URL: &str = "/dishes/";
const FORM_TEMPLATE: &str = "dish_form.html.tera";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LIST_URL, get(list_dishes))
        .route("/dishes/create", get(new_dish).post(create_dish))
        .route("/dishes/{id}", get(show_dish))
        .route("/dishes/{id}/update", get(edit_dish).post(update_dish))
        .route("/dishes/{id}/delete", get(confirm_delete_dish).post(delete_dish))
        .route("/dishes/{id}/toggle-assign", post(toggle_assign))
}

#[derive(Deserialize)]
struct Params {
    #[serde(default)]
    ingredient: String,
    page: Option<String>,
}

fn detail_url(id: i32) -> String {
    format!("/dishes/{id}")
}

/// Adds the dish type, ingredient and cook choices to a form page.
async fn with_choices(state: &AppState, ctx: &mut Context) -> Result<(), AppError> {
    let choices = QueryCore::find_dish_choices(&state.conn).await?;
    ctx.insert("choices", &choices);
    Ok(())
}

async fn list_dishes(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Query(params): Query<Params>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let number = page_number(params.page.as_deref())?;
    let page = QueryCore::find_dishes_in_page(&state.conn, &params.ingredient, number).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("page", &page);
    ctx.insert("ingredient", &params.ingredient);

    render(&state, "dish_list.html.tera", &ctx)
}

async fn show_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let detail = QueryCore::find_dish_detail(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("is_assigned", &detail.is_assigned(user.id));
    ctx.insert("detail", &detail);

    render(&state, "dish_detail.html.tera", &ctx)
}

async fn new_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("form", &DishForm::default());
    empty_errors(&mut ctx);
    with_choices(&state, &mut ctx).await?;

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn create_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let (form, errors) = RawForm::from(pairs).dish();

    let result = match errors.into_result() {
        Ok(()) => MutationCore::create_dish(&state.conn, form.clone()).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => {
            let data = FlashData::success("Dish successfully added");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("form", &form);
            with_choices(&state, &mut ctx).await?;
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn edit_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let detail = QueryCore::find_dish_detail(&state.conn, id).await?;
    let form = DishForm::from_model(&detail.dish, &detail.ingredients, &detail.cooks);

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("dish", &detail.dish);
    ctx.insert("form", &form);
    empty_errors(&mut ctx);
    with_choices(&state, &mut ctx).await?;

    render(&state, FORM_TEMPLATE, &ctx)
}

async fn update_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let dish = QueryCore::find_dish_by_id(&state.conn, id).await?;
    let (form, errors) = RawForm::from(pairs).dish();

    let result = match errors.into_result() {
        Ok(()) => MutationCore::update_dish_by_id(&state.conn, id, form.clone()).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(_) => {
            let data = FlashData::success("Dish successfully updated");
            Ok(post_response(&cookies, data, LIST_URL)?.into_response())
        }
        Err(err @ ServiceError::NotFound { .. }) => Err(err.into()),
        Err(err) => {
            let mut ctx = page_context(&cookies, Some(&user));
            ctx.insert("dish", &dish);
            ctx.insert("form", &form);
            with_choices(&state, &mut ctx).await?;
            form_error(&state, FORM_TEMPLATE, ctx, err)
        }
    }
}

async fn confirm_delete_dish(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    let dish = QueryCore::find_dish_by_id(&state.conn, id).await?;

    let mut ctx = page_context(&cookies, Some(&user));
    ctx.insert("object", &dish.name);
    ctx.insert("kind", "dish");
    ctx.insert("cancel_url", &detail_url(id));

    render(&state, "confirm_delete.html.tera", &ctx)
}

async fn delete_dish(
    state: State<AppState>,
    CurrentCook(_user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Response, AppError> {
    MutationCore::delete_dish(&state.conn, id).await?;

    let data = FlashData::success("Dish successfully deleted");
    Ok(post_response(&cookies, data, LIST_URL)?.into_response())
}

/// Assigns the logged-in cook to the dish, or removes them when they
/// already are assigned.
async fn toggle_assign(
    state: State<AppState>,
    CurrentCook(user): CurrentCook,
    Path(id): Path<i32>,
    cookies: Cookies,
) -> Result<Response, AppError> {
    let message = match MutationCore::toggle_dish_assignment(&state.conn, id, user.id).await? {
        Assignment::Assigned => "You are now assigned to this dish",
        Assignment::Unassigned => "You are no longer assigned to this dish",
    };

    Ok(post_response(&cookies, FlashData::success(message), &detail_url(id))?.into_response())
}
