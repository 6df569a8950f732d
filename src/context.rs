use std::future::{ready, Ready};

use crate::actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use crate::core::models::user::Role;
use crate::error::{Error, Rejection};

/// Identity of the caller, placed in request extensions by the session middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub role: Role,
    pub dept: String,
}

fn current(req: &HttpRequest) -> Result<UserInfo, Rejection> {
    req.extensions()
        .get::<UserInfo>()
        .cloned()
        .ok_or_else(|| Rejection::new(Error::LoginRequired, "/login"))
}

fn require(req: &HttpRequest, role: Role) -> Result<UserInfo, Rejection> {
    let user = current(req)?;
    if user.role != role {
        log::warn!("user {} ({}) denied access to {}", user.id, user.role, req.path());
        return Err(Rejection::new(Error::AccessDenied, user.role.home()));
    }
    Ok(user)
}

impl FromRequest for UserInfo {
    type Error = Rejection;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current(req))
    }
}

pub struct Admin(pub UserInfo);

impl FromRequest for Admin {
    type Error = Rejection;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(require(req, Role::Admin).map(Admin))
    }
}

pub struct Student(pub UserInfo);

impl FromRequest for Student {
    type Error = Rejection;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(require(req, Role::Student).map(Student))
    }
}
