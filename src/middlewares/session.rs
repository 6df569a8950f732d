use std::future::{ready, Future, Ready};
use std::ops::Add;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::actix_web::{
    cookie::{time::OffsetDateTime, Cookie, CookieBuilder, SameSite},
    dev::{Service, ServiceRequest, Transform},
    Error, HttpMessage,
};
use crate::context::UserInfo;
use crate::core::models::user::{Role, User};
use crate::core::tokener::{Payload, Tokener};
use crate::error::Error as BallotError;
use crate::impls::tokener::jwt::JWT;

pub static SESSION_COOKIE: &str = "SESSION";

#[derive(Debug, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub name: String,
    pub role: Role,
    pub dept: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn subject(&self) -> &str {
        &self.user
    }

    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl TryFrom<Claim> for UserInfo {
    type Error = BallotError;
    fn try_from(claim: Claim) -> Result<Self, Self::Error> {
        let id = claim.user.parse::<i32>().map_err(|e| BallotError::BusinessError(format!("invalid session subject: {}", e)))?;
        Ok(UserInfo {
            id,
            name: claim.name,
            role: claim.role,
            dept: claim.dept,
        })
    }
}

/// Issues and reads the signed session cookie.
#[derive(Clone)]
pub struct Sessions {
    tokener: JWT,
    ttl_hours: i64,
}

impl Sessions {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            tokener: JWT::new(secret),
            ttl_hours,
        }
    }

    pub fn issue(&self, user: &User) -> Result<Cookie<'static>, BallotError> {
        let claim = Claim {
            user: user.id.to_string(),
            name: user.fullname.clone(),
            role: user.role()?,
            dept: user.dept.clone(),
            exp: chrono::Utc::now().add(chrono::Duration::hours(self.ttl_hours)).timestamp(),
        };
        let token = self.tokener.sign(&claim)?;
        Ok(CookieBuilder::new(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish())
    }

    pub fn verify(&self, token: &str) -> Result<UserInfo, BallotError> {
        let claim: Claim = self.tokener.verify(token)?;
        log::trace!("session for {} valid until {}", claim.subject(), claim.expires_at());
        claim.try_into()
    }

    pub fn clear() -> Cookie<'static> {
        CookieBuilder::new(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .expires(OffsetDateTime::UNIX_EPOCH)
            .finish()
    }

    pub fn middleware(&self) -> Session {
        Session { sessions: self.clone() }
    }
}

/// Attaches the caller's identity to the request; never rejects by itself.
pub struct Session {
    sessions: Sessions,
}

impl<S> Transform<S, ServiceRequest> for Session
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = SessionService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionService {
            sessions: self.sessions.clone(),
            next_service: service,
        }))
    }
}

pub struct SessionService<S> {
    sessions: Sessions,
    next_service: S,
}

impl<S> Service<ServiceRequest> for SessionService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<Error>,
{
    type Response = S::Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(cookie) = req.cookie(SESSION_COOKIE) {
            match self.sessions.verify(cookie.value()) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(e) => log::debug!("ignoring session cookie: {}", e),
            }
        }
        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}
