use crate::config::DEFAULT_PHOTO;
use crate::core::models::{
    candidate::{Candidate, Create, Insert, Query},
    election::Election,
};
use crate::core::ports::repository::{CandidateCommon, ElectionCommon, Store};
use crate::core::uploader::Uploader;
use crate::error::Error;

pub async fn candidates_of<S>(store: &mut S, election_id: i32) -> Result<(Election, Vec<Candidate>), Error>
where
    S: Store,
{
    let election = ElectionCommon::get(store, election_id).await?.ok_or(Error::ElectionNotFound)?;
    let candidates = CandidateCommon::query(store, Query { election_id_eq: Some(election_id) }).await?;
    Ok((election, candidates))
}

/// Adds a candidate, storing the photo first when one was sent.
pub async fn add_candidate<S, U>(store: &mut S, uploader: &mut U, election_id: i32, candidate: Create) -> Result<i32, Error>
where
    S: Store,
    U: Uploader,
{
    if candidate.name.trim().is_empty() {
        return Err(Error::BusinessError("Candidate name is required.".into()));
    }
    if ElectionCommon::get(store, election_id).await?.is_none() {
        return Err(Error::ElectionNotFound);
    }
    let photo = match candidate.photo {
        Some(mut file) => {
            file.election_id = election_id;
            uploader.put(file).await?
        }
        None => DEFAULT_PHOTO.to_owned(),
    };
    let inserted = CandidateCommon::insert(
        store,
        Insert {
            election_id,
            name: candidate.name.trim().to_owned(),
            dept: candidate.dept.trim().to_owned(),
            roll_no: candidate.roll_no.trim().to_owned(),
            photo: photo.clone(),
        },
    )
    .await;
    match inserted {
        Ok(id) => {
            log::info!("added candidate {} to election {}", id, election_id);
            Ok(id)
        }
        Err(e) => {
            if photo != DEFAULT_PHOTO {
                if let Err(del) = uploader.delete(&photo).await {
                    log::warn!("could not remove orphaned photo {}: {}", photo, del);
                }
            }
            Err(e)
        }
    }
}
