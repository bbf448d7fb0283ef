//! # Session
//!
//! The upstream API issues an opaque bearer token at login. We keep it in a
//! single HttpOnly cookie named `sid` and forward it as
//! `Authorization: Bearer <sid>` on every authenticated call.
//!
//! ## Cookie
//! - name: `sid`
//! - HttpOnly, `SameSite=Strict`, path `/`
//! - lasts 7 days, the upstream decides when the token itself expires
//! - `Secure` only in production so local http development still works
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "sid";

const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Bearer token read from the `sid` cookie.
#[derive(Clone, Debug)]
pub struct Session(pub String);

impl Session {
    pub fn token(&self) -> &str {
        &self.0
    }
}

pub fn session_token(jar: &CookieJar) -> Result<String, AppError> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(AppError::MissingSession)
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        session_token(&jar).map(Session)
    }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
