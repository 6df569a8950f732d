use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, HttpResponseBuilder,
};

use crate::serde::{Deserialize, Serialize};

pub static FLASH_COOKIE: &str = "FLASH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

/// One-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    pub fn to_cookie(&self) -> Cookie<'static> {
        let value = serde_json::to_vec(self).map(hex::encode).unwrap_or_default();
        CookieBuilder::new(FLASH_COOKIE, value).path("/").http_only(true).finish()
    }

    pub(crate) fn from_cookie(cookie: &Cookie) -> Option<Self> {
        let bytes = hex::decode(cookie.value()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[derive(Debug, Serialize)]
pub struct View<T> {
    notice: Option<Notice>,
    data: T,
}

fn expired(name: &'static str) -> Cookie<'static> {
    CookieBuilder::new(name, "").path("/").expires(OffsetDateTime::UNIX_EPOCH).finish()
}

pub fn see_other(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(StatusCode::SEE_OTHER);
    builder.insert_header((header::LOCATION, location));
    builder
}

pub fn redirect(location: &str) -> HttpResponse {
    see_other(location).finish()
}

pub fn redirect_with_notice(location: &str, notice: Notice) -> HttpResponse {
    see_other(location).cookie(notice.to_cookie()).finish()
}

pub fn success(location: &str, message: impl Into<String>) -> HttpResponse {
    redirect_with_notice(location, Notice::new(Level::Success, message))
}

/// Renders `data` together with any pending notice, consuming the notice.
pub fn render<T: Serialize>(req: &HttpRequest, data: T) -> HttpResponse {
    let notice = req.cookie(FLASH_COOKIE).and_then(|c| Notice::from_cookie(&c));
    let mut builder = HttpResponse::build(StatusCode::OK);
    if notice.is_some() {
        builder.cookie(expired(FLASH_COOKIE));
    }
    builder.json(View { notice, data })
}
