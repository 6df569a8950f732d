use crate::config::DEFAULT_PHOTO;
use crate::core::models::{
    candidate::Query as CandidateQuery,
    election::{Election, ElectionCreate},
};
use crate::core::ports::repository::{CandidateCommon, ElectionCommon, Store, TxStore, VoteCommon};
use crate::core::uploader::Uploader;
use crate::error::Error;

pub async fn publish_election<S>(store: &mut S, election: ElectionCreate) -> Result<i32, Error>
where
    S: Store,
{
    let title = election.title.clone();
    let id = ElectionCommon::insert(store, election.into()).await?;
    log::info!("published election {} ({})", id, title);
    Ok(id)
}

pub async fn list_elections<S>(store: &mut S) -> Result<Vec<Election>, Error>
where
    S: Store,
{
    ElectionCommon::query(store, default::default()).await
}

async fn cascade<T>(tx: &mut T, id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    VoteCommon::delete_by_election(tx, id).await?;
    CandidateCommon::delete_by_election(tx, id).await?;
    ElectionCommon::delete(tx, id).await?;
    Ok(())
}

/// Deletes the election with its ballots and candidates, all or nothing.
/// Candidate photos are removed once the rows are gone.
pub async fn delete_election<T, U>(mut tx: T, uploader: &mut U, id: i32) -> Result<(), Error>
where
    T: TxStore,
    U: Uploader,
{
    if ElectionCommon::get(&mut tx, id).await?.is_none() {
        tx.rollback().await?;
        return Err(Error::ElectionNotFound);
    }
    let photos: Vec<String> = CandidateCommon::query(&mut tx, CandidateQuery { election_id_eq: Some(id) })
        .await?
        .into_iter()
        .map(|c| c.photo)
        .filter(|p| p != DEFAULT_PHOTO)
        .collect();
    if let Err(e) = cascade(&mut tx, id).await {
        log::error!("failed to delete election {}: {}", id, e);
        if let Err(e) = tx.rollback().await {
            log::error!("rollback after failed delete of election {}: {}", id, e);
        }
        return Err(Error::ReferentialDeleteFailure);
    }
    tx.commit().await.map_err(|e| {
        log::error!("failed to commit delete of election {}: {}", id, e);
        Error::ReferentialDeleteFailure
    })?;
    log::info!("deleted election {}", id);
    for photo in photos {
        if let Err(e) = uploader.delete(&photo).await {
            log::warn!("could not remove photo {}: {}", photo, e);
        }
    }
    Ok(())
}
