pub mod candidate;
pub mod election;
pub mod result;
pub mod user;
pub mod vote;

use crate::actix_web::{
    error::{PathError, UrlencodedError},
    web::{Data, Form, FormConfig, PathConfig},
    HttpRequest, HttpResponse,
};
use crate::context::UserInfo;
use crate::core::models::user::Register;
use crate::core::ports::repository::Manager;
use crate::core::services;
use crate::error::{Error, OrRedirect, Rejection};
use crate::middlewares::session::Sessions;
use crate::response::{redirect, render, see_other, success, Level, Notice};
use crate::serde::{Deserialize, Serialize};

/// Malformed forms go back to the page that posted them.
pub fn form_config() -> FormConfig {
    FormConfig::default().error_handler(|err: UrlencodedError, req: &HttpRequest| {
        Rejection::new(Error::BusinessError(format!("Invalid form: {}", err)), req.path()).into()
    })
}

pub fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err: PathError, _: &HttpRequest| {
        log::debug!("bad path parameter: {}", err);
        Rejection::new(Error::BusinessError("Invalid link.".into()), "/").into()
    })
}

#[derive(Debug, Serialize)]
struct Landing {
    user: Option<String>,
    home: Option<&'static str>,
}

pub async fn index(req: HttpRequest, user: Option<UserInfo>) -> HttpResponse {
    render(
        &req,
        Landing {
            home: user.as_ref().map(|u| u.role.home()),
            user: user.map(|u| u.name),
        },
    )
}

#[derive(Deserialize)]
pub struct Login {
    pub roll_no: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct FormPage {
    fields: &'static [&'static str],
}

pub async fn login_page(req: HttpRequest, user: Option<UserInfo>) -> HttpResponse {
    if let Some(user) = user {
        return redirect(user.role.home());
    }
    render(&req, FormPage { fields: &["roll_no", "password"] })
}

pub async fn login<M: Manager + 'static>(Form(Login { roll_no, password }): Form<Login>, db: Data<M>, sessions: Data<Sessions>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect("/login")?;
    let user = services::user::login(&mut store, roll_no.trim(), &password).await.or_redirect("/login")?;
    let role = user.role().or_redirect("/login")?;
    let cookie = sessions.issue(&user).or_redirect("/login")?;
    Ok(see_other(role.home())
        .cookie(cookie)
        .cookie(Notice::new(Level::Success, format!("Welcome, {}!", user.fullname)).to_cookie())
        .finish())
}

pub async fn register_page(req: HttpRequest) -> HttpResponse {
    render(
        &req,
        FormPage {
            fields: &["roll_no", "fullname", "email", "dept", "password"],
        },
    )
}

pub async fn register<M: Manager + 'static>(Form(form): Form<Register>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect("/register")?;
    services::user::register(&mut store, form).await.or_redirect("/register")?;
    Ok(success("/login", "Registration successful! Wait for Admin approval."))
}

pub async fn logout() -> HttpResponse {
    see_other("/login")
        .cookie(Sessions::clear())
        .cookie(Notice::new(Level::Info, "You have been logged out.").to_cookie())
        .finish()
}
