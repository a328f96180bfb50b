//! Cookie-backed sessions and the logged-in cook.
//!
//! A [`Session`] is a small JSON map kept in one private (encrypted and
//! authenticated) cookie. Every change is written back to the cookie jar at
//! once, so handlers never need to save it explicitly.

use std::collections::BTreeMap;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use entity::cook;
use kitchen_service::Query as QueryCore;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower_cookies::{cookie::SameSite, Cookie, Cookies, Key};
use tracing::{debug, warn};

use crate::AppState;

pub const SESSION_COOKIE_NAME: &str = "kitchen_session";
pub const LOGIN_URL: &str = "/accounts/login";

const COOK_ID: &str = "cook_id";

pub struct Session {
    cookies: Cookies,
    key: Key,
    data: BTreeMap<String, Value>,
}

impl Session {
    fn load(cookies: Cookies, key: Key) -> Self {
        let data = cookies
            .private(&key)
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
            .unwrap_or_default();

        Self { cookies, key, data }
    }

    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.data
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn insert<T>(&mut self, key: &str, value: T)
    where
        T: Serialize,
    {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.data.insert(key.to_owned(), value);
                self.save();
            }
            Err(err) => warn!(key, error = %err, "session value not serializable"),
        }
    }

    pub fn remove(&mut self, key: &str) {
        if self.data.remove(key).is_some() {
            self.save();
        }
    }

    /// Drops every key and expires the cookie.
    pub fn clear(&mut self) {
        self.data.clear();
        let mut removal = Cookie::from(SESSION_COOKIE_NAME);
        removal.set_path("/");
        self.cookies.private(&self.key).remove(removal);
    }

    pub fn cook_id(&self) -> Option<i32> {
        self.get(COOK_ID)
    }

    /// Starts a fresh session for `cook_id`.
    pub fn log_in(&mut self, cook_id: i32) {
        self.data.clear();
        self.insert(COOK_ID, cook_id);
    }

    fn save(&self) {
        let value = match serde_json::to_string(&self.data) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "session not saved");
                return;
            }
        };
        let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        self.cookies.private(&self.key).add(cookie);
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;
        Ok(Session::load(cookies, state.key.clone()))
    }
}

/// The cook named by the session. Extracting it from a request without a
/// valid login redirects to the login page.
pub struct CurrentCook(pub cook::Model);

impl FromRequestParts<AppState> for CurrentCook {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if let Some(cook_id) = session.cook_id() {
            match QueryCore::find_cook_by_id(&state.conn, cook_id).await {
                Ok(cook) => return Ok(CurrentCook(cook)),
                Err(err) if err.is_not_found() => debug!(cook_id, "session names a deleted cook"),
                Err(err) => return Err(crate::error::AppError::from(err).into_response()),
            }
        }

        let next = parts
            .uri
            .path_and_query()
            .map(|path| path.as_str())
            .unwrap_or("/");
        Err(login_redirect(next).into_response())
    }
}

pub fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("{LOGIN_URL}?next={}", encode_query_value(next)))
}

/// Percent-encodes everything outside the URL unreserved set and `/`.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// `next` when it is a path on this site, `/` otherwise.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(next)
            if next.starts_with('/')
                && !next.starts_with("//")
                && !next.contains('\\')
                && !next.chars().any(char::is_control) =>
        {
            next
        }
        _ => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/dishes/?page=2")), "/dishes/?page=2");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn login_redirect_encodes_the_query() {
        assert_eq!(encode_query_value("/dishes/"), "/dishes/");
        assert_eq!(
            encode_query_value("/cooks/?username=a b&page=2"),
            "/cooks/%3Fusername%3Da%20b%26page%3D2"
        );
    }
}
