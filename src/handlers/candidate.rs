use bytes::BytesMut;
use futures_util::TryStreamExt;
use serde::Serialize;

use crate::actix_multipart::Multipart;
use crate::actix_web::{
    web::{Data, Path},
    HttpRequest, HttpResponse,
};
use crate::context::Admin;
use crate::core::models::{
    candidate::{Candidate, Create},
    election::Election,
    Photo,
};
use crate::core::ports::repository::Manager;
use crate::core::services::candidate::{add_candidate, candidates_of};
use crate::error::{Error, OrRedirect, Rejection};
use crate::impls::uploaders::local_storage::LocalStorage;
use crate::response::{render, success};

#[derive(Debug, Serialize)]
struct CandidatePage {
    election: Election,
    candidates: Vec<Candidate>,
}

/// A missing election has no page of its own to return to.
fn back_to(election_id: i32, e: &Error) -> String {
    match e {
        Error::ElectionNotFound => "/admin_dashboard".into(),
        _ => format!("/add_candidate/{}", election_id),
    }
}

pub async fn list<M: Manager + 'static>(req: HttpRequest, _: Admin, path: Path<(i32,)>, db: Data<M>) -> Result<HttpResponse, Rejection> {
    let (election_id,) = path.into_inner();
    let mut store = db.acquire().await.or_redirect("/admin_dashboard")?;
    let (election, candidates) = candidates_of(&mut store, election_id).await.or_redirect("/admin_dashboard")?;
    Ok(render(&req, CandidatePage { election, candidates }))
}

fn text(content: BytesMut) -> Result<String, Error> {
    String::from_utf8(content.to_vec()).map_err(|_| Error::BusinessError("Form fields must be valid UTF-8.".into()))
}

/// Reads the `name`, `dept`, `roll_no` and `photo` parts of the candidate form.
async fn read_form(mut payload: Multipart, max_bytes: usize) -> Result<Create, Error> {
    let mut form = Create {
        name: String::new(),
        dept: String::new(),
        roll_no: String::new(),
        photo: None,
    };
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().to_owned();
        let filename = field.content_disposition().get_filename().map(|f| f.to_owned());
        let mut content = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            if content.len() + chunk.len() > max_bytes {
                return Err(Error::UploadFailure(format!("file exceeds {} bytes", max_bytes)));
            }
            content.extend_from_slice(&chunk);
        }
        match name.as_str() {
            "name" => form.name = text(content)?,
            "dept" => form.dept = text(content)?,
            "roll_no" => form.roll_no = text(content)?,
            // an empty file input still sends a part, just without content
            "photo" => match filename {
                Some(filename) if !filename.is_empty() && !content.is_empty() => {
                    form.photo = Some(Photo {
                        filename,
                        content: content.to_vec(),
                        election_id: 0,
                    })
                }
                _ => {}
            },
            _ => log::debug!("ignoring unexpected form part {}", name),
        }
    }
    Ok(form)
}

pub async fn add<M: Manager + 'static>(_: Admin, path: Path<(i32,)>, payload: Multipart, db: Data<M>, storage: Data<LocalStorage>) -> Result<HttpResponse, Rejection> {
    let (election_id,) = path.into_inner();
    let page = format!("/add_candidate/{}", election_id);
    let mut uploader = storage.get_ref().clone();
    let form = read_form(payload, uploader.max_bytes()).await.or_redirect(&page)?;
    let mut store = db.acquire().await.or_redirect(&page)?;
    if let Err(e) = add_candidate(&mut store, &mut uploader, election_id, form).await {
        let location = back_to(election_id, &e);
        return Err(Rejection::new(e, location));
    }
    Ok(success(&page, "Candidate added successfully!"))
}
