use serde::{Deserialize, Serialize};

use crate::actix_web::{
    web::{Data, Form, Path},
    HttpRequest, HttpResponse,
};
use crate::context::Student;
use crate::core::models::{common::deserialize_optional_id, election::DashboardItem, vote::CastOutcome};
use crate::core::ports::repository::Manager;
use crate::core::services::vote::{ballot, cast_vote, dashboard as student_dashboard};
use crate::error::{Error, OrRedirect, Rejection};
use crate::response::{render, success};

const DASHBOARD: &str = "/student_dashboard";

#[derive(Debug, Serialize)]
struct Dashboard {
    name: String,
    dept: String,
    elections: Vec<DashboardItem>,
}

pub async fn dashboard<M: Manager + 'static>(req: HttpRequest, Student(student): Student, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let mut store = db.acquire().await.or_redirect("/")?;
    let elections = student_dashboard(&mut store, student.id, &student.dept).await.or_redirect("/")?;
    Ok(render(
        &req,
        Dashboard {
            name: student.name,
            dept: student.dept,
            elections,
        },
    ))
}

pub async fn ballot_page<M: Manager + 'static>(req: HttpRequest, Student(student): Student, path: Path<(i32,)>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let (election_id,) = path.into_inner();
    let mut store = db.acquire().await.or_redirect(DASHBOARD)?;
    let ballot = ballot(&mut store, student.id, &student.dept, election_id).await.or_redirect(DASHBOARD)?;
    Ok(render(&req, ballot))
}

#[derive(Debug, Deserialize)]
pub struct Cast {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub candidate_id: Option<i32>,
}

pub async fn cast<M: Manager + 'static>(
    req: HttpRequest,
    Student(student): Student,
    path: Path<(i32,)>,
    Form(Cast { candidate_id }): Form<Cast>,
    db: Data<M>,
) -> Result<HttpResponse, Rejection> {
    let (election_id,) = path.into_inner();
    let mut store = db.acquire().await.or_redirect(DASHBOARD)?;
    match cast_vote(&mut store, student.id, &student.dept, election_id, candidate_id).await {
        Ok(CastOutcome::Recorded) => Ok(success(DASHBOARD, "Vote cast successfully!")),
        Ok(CastOutcome::NoSelection) => {
            let ballot = ballot(&mut store, student.id, &student.dept, election_id).await.or_redirect(DASHBOARD)?;
            Ok(render(&req, ballot))
        }
        Err(e @ Error::InvalidCandidate) => Err(Rejection::new(e, format!("/vote/{}", election_id))),
        Err(e) => Err(Rejection::new(e, DASHBOARD)),
    }
}
