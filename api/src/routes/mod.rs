pub mod auth;
pub mod cook;
pub mod dish;
pub mod dish_type;
pub mod index;
pub mod ingredient;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use entity::cook as cook_entity;
use kitchen_service::{FieldErrors, ServiceError};
use tera::Context;
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    flash::{take_flash_cookie, FlashData},
    AppState,
};

/// Context every page starts from: the logged-in cook and any pending flash
/// message.
fn page_context(cookies: &Cookies, user: Option<&cook_entity::Model>) -> Context {
    let mut ctx = Context::new();
    if let Some(user) = user {
        ctx.insert("user", user);
    }
    if let Some(flash) = take_flash_cookie::<FlashData>(cookies) {
        ctx.insert("flash", &flash);
    }
    ctx
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render(template, ctx)?))
}

/// Shows a form again with the messages carried by `err`; errors that do not
/// belong to a form are passed on.
fn form_error(
    state: &AppState,
    template: &str,
    mut ctx: Context,
    err: ServiceError,
) -> Result<Response, AppError> {
    let Some(errors) = err.field_errors() else {
        return Err(err.into());
    };
    ctx.insert("errors", &errors);

    let body = render(state, template, &ctx)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response())
}

fn empty_errors(ctx: &mut Context) {
    ctx.insert("errors", &FieldErrors::new());
}

/// The `page` query value: blank means the first page, anything that is not a
/// page number is a page that does not exist.
fn page_number(page: Option<&str>) -> Result<Option<u64>, AppError> {
    match page.map(str::trim) {
        None | Some("") => Ok(None),
        Some(page) => page.parse().map(Some).map_err(|_| AppError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_pages_are_the_first_and_words_are_missing() {
        assert_eq!(page_number(None).unwrap(), None);
        assert_eq!(page_number(Some("")).unwrap(), None);
        assert_eq!(page_number(Some("3")).unwrap(), Some(3));
        assert!(matches!(page_number(Some("abc")), Err(AppError::NotFound)));
        assert!(matches!(page_number(Some("-1")), Err(AppError::NotFound)));
    }
}
