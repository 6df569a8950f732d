use serde::Serialize;

use crate::actix_web::{
    web::{Data, Form, Path},
    HttpRequest, HttpResponse,
};
use crate::context::Admin;
use crate::core::models::election::{Election, ElectionCreate};
use crate::core::ports::repository::Manager;
use crate::core::services::election::{delete_election, list_elections, publish_election};
use crate::core::uploader::Uploader;
use crate::error::{OrRedirect, Rejection};
use crate::response::{redirect_with_notice, render, success, Level, Notice};

const DASHBOARD: &str = "/admin_dashboard";

#[derive(Debug, Serialize)]
struct Dashboard {
    admin: String,
    elections: Vec<Election>,
}

pub async fn dashboard<M: Manager + 'static>(req: HttpRequest, Admin(admin): Admin, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect("/")?;
    let elections = list_elections(&mut store).await.or_redirect("/")?;
    Ok(render(&req, Dashboard { admin: admin.name, elections }))
}

pub async fn publish<M: Manager + 'static>(_: Admin, Form(election): Form<ElectionCreate>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect(DASHBOARD)?;
    publish_election(&mut store, election).await.or_redirect(DASHBOARD)?;
    Ok(success(DASHBOARD, "Election published successfully!"))
}

pub async fn delete<M, U>(_: Admin, path: Path<(i32,)>, db: Data<M>, storage: Data<U>) -> Result<HttpResponse, Rejection>
where
    M: Manager + 'static,
    U: Uploader + Clone + 'static,
{
    let (id,) = path.into_inner();
    let tx = db.begin().await.or_redirect(DASHBOARD)?;
    let mut uploader = storage.get_ref().clone();
    delete_election(tx, &mut uploader, id).await.or_redirect(DASHBOARD)?;
    Ok(redirect_with_notice(DASHBOARD, Notice::new(Level::Info, "Election deleted successfully.")))
}
