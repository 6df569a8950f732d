use std::collections::HashSet;

use crate::core::models::{
    candidate::Query as CandidateQuery,
    election::{DashboardItem, Election, Query as ElectionQuery},
    vote::{Ballot, CastOutcome, Insert as VoteInsert},
};
use crate::core::ports::repository::{CandidateCommon, ElectionCommon, Store, VoteCommon};
use crate::error::Error;

/// Elections of the student's department, flagged where a ballot was already cast.
pub async fn dashboard<S>(store: &mut S, student_id: i32, dept: &str) -> Result<Vec<DashboardItem>, Error>
where
    S: Store,
{
    let elections = ElectionCommon::query(
        store,
        ElectionQuery {
            dept_eq: Some(dept.to_owned()),
        },
    )
    .await?;
    let voted: HashSet<i32> = VoteCommon::voted_election_ids(store, student_id).await?.into_iter().collect();
    Ok(elections
        .into_iter()
        .map(|election| DashboardItem {
            has_voted: voted.contains(&election.id),
            election,
        })
        .collect())
}

async fn eligible_election<S>(store: &mut S, dept: &str, election_id: i32) -> Result<Election, Error>
where
    S: Store,
{
    let election = ElectionCommon::get(store, election_id).await?.ok_or(Error::ElectionNotFound)?;
    if election.dept != dept {
        log::warn!("{} student tried to open election {} scoped to {}", dept, election_id, election.dept);
        return Err(Error::NotEligible(dept.to_owned()));
    }
    Ok(election)
}

pub async fn ballot<S>(store: &mut S, student_id: i32, dept: &str, election_id: i32) -> Result<Ballot, Error>
where
    S: Store,
{
    let election = eligible_election(store, dept, election_id).await?;
    let candidates = CandidateCommon::query(store, CandidateQuery { election_id_eq: Some(election_id) }).await?;
    let has_voted = VoteCommon::exists(store, student_id, election_id).await?;
    Ok(Ballot {
        election,
        candidates,
        has_voted,
    })
}

/// Records one ballot per student and election.
///
/// The existence check only short-circuits the common case; concurrent
/// submissions are settled by the unique (student, election) key on insert.
pub async fn cast_vote<S>(store: &mut S, student_id: i32, dept: &str, election_id: i32, candidate_id: Option<i32>) -> Result<CastOutcome, Error>
where
    S: Store,
{
    eligible_election(store, dept, election_id).await?;
    let candidate_id = match candidate_id {
        Some(id) => id,
        None => return Ok(CastOutcome::NoSelection),
    };
    if VoteCommon::exists(store, student_id, election_id).await? {
        log::warn!("student {} already voted in election {}", student_id, election_id);
        return Err(Error::AlreadyVoted);
    }
    match CandidateCommon::get(store, candidate_id).await? {
        Some(c) if c.election_id == election_id => {}
        _ => return Err(Error::InvalidCandidate),
    }
    VoteCommon::insert(
        store,
        VoteInsert {
            student_id,
            election_id,
            candidate_id,
        },
    )
    .await
    .map_err(|e| {
        if let Error::AlreadyVoted = e {
            log::warn!("duplicate ballot from student {} in election {} rejected on insert", student_id, election_id);
        }
        e
    })?;
    log::info!("student {} voted in election {}", student_id, election_id);
    Ok(CastOutcome::Recorded)
}
