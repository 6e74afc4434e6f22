//! One-shot flash messages carried in a cookie across a redirect
//!
//! The cookie holds an i18n key, not text, so it stays ASCII and is
//! translated when the next page renders.

use axum::response::{IntoResponse, Redirect, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};

use crate::content::Locale;
use crate::i18n;

const FLASH_COOKIE_NAME: &str = "_flash";

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub key: String,
}

impl Flash {
    pub fn success(key: &str) -> Self {
        Self {
            kind: FlashKind::Success,
            key: key.to_string(),
        }
    }

    pub fn error(key: &str) -> Self {
        Self {
            kind: FlashKind::Error,
            key: key.to_string(),
        }
    }

    pub fn view(&self, locale: Locale) -> FlashView {
        FlashView {
            kind: self.kind,
            message: i18n::t(locale, &self.key).to_string(),
        }
    }
}

/// What templates see
#[derive(Debug, Clone, Serialize)]
pub struct FlashView {
    pub kind: FlashKind,
    pub message: String,
}

fn read_cookie<T: DeserializeOwned>(cookies: &Cookies) -> Option<T> {
    cookies.get(FLASH_COOKIE_NAME).and_then(|cookie| {
        serde_json::from_str::<ValuedMessage<T>>(cookie.value())
            .ok()
            .map(|message| message.value)
    })
}

/// Read the pending flash message and clear it
pub fn take_flash(cookies: &Cookies) -> Option<Flash> {
    let flash = read_cookie::<Flash>(cookies);
    if cookies.get(FLASH_COOKIE_NAME).is_some() {
        let mut cookie = Cookie::new(FLASH_COOKIE_NAME, "");
        cookie.set_path("/");
        cookies.remove(cookie);
    }
    flash
}

pub fn set_flash(cookies: &Cookies, flash: &Flash) {
    let value = match serde_json::to_string(&ValuedMessageRef { value: flash }) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot encode flash message");
            return;
        }
    };
    let mut cookie = Cookie::new(FLASH_COOKIE_NAME, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);
}

/// 303 redirect that shows `flash` on the next page
pub fn redirect_with_flash(cookies: &Cookies, to: &str, flash: Flash) -> Response {
    set_flash(cookies, &flash);
    Redirect::to(to).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_view_translates_key() {
        let flash = Flash::success("contact_sent");
        let view = flash.view(Locale::En);
        assert_eq!(view.kind, FlashKind::Success);
        assert_eq!(view.message, i18n::t(Locale::En, "contact_sent"));
    }

    #[test]
    fn test_cookie_round_trip() {
        let cookies = Cookies::default();
        set_flash(&cookies, &Flash::error("submit_failed"));
        assert_eq!(take_flash(&cookies), Some(Flash::error("submit_failed")));
        assert_eq!(take_flash(&cookies), None);
    }
}
