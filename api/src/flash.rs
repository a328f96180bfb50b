use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use crate::error::AppError;

#[derive(Deserialize)]
struct ValuedMessage<T> {
    #[serde(rename = "_")]
    value: T,
}

#[derive(Serialize)]
struct ValuedMessageRef<'a, T> {
    #[serde(rename = "_")]
    value: &'a T,
}

const FLASH_COOKIE_NAME: &str = "_flash";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlashData {
    pub kind: String,
    pub message: String,
}

impl FlashData {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success".to_owned(),
            message: message.into(),
        }
    }
}

/// Reads the pending flash message and removes it, so it shows only once.
pub fn take_flash_cookie<T>(cookies: &Cookies) -> Option<T>
where
    T: DeserializeOwned,
{
    let flash_cookie = cookies.get(FLASH_COOKIE_NAME)?;
    let mut removal = Cookie::from(FLASH_COOKIE_NAME);
    removal.set_path("/");
    cookies.remove(removal);

    serde_json::from_str::<ValuedMessage<T>>(flash_cookie.value())
        .ok()
        .map(|ValuedMessage { value }| value)
}

pub type PostResponse = (StatusCode, HeaderMap);

/// Stores `data` as the flash message and redirects to `location`.
pub fn post_response<T>(cookies: &Cookies, data: T, location: &str) -> Result<PostResponse, AppError>
where
    T: Serialize,
{
    let valued_message_ref = ValuedMessageRef { value: &data };
    let value = serde_json::to_string(&valued_message_ref)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut cookie = Cookie::new(FLASH_COOKIE_NAME, value);
    cookie.set_path("/");
    cookies.add(cookie);

    let mut header = HeaderMap::new();
    header.insert(
        header::LOCATION,
        HeaderValue::from_str(location).map_err(|e| AppError::Internal(e.to_string()))?,
    );

    Ok((StatusCode::SEE_OTHER, header))
}
