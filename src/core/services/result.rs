use crate::core::models::vote::{ElectionResult, Query as VoteQuery};
use crate::core::ports::repository::{ElectionCommon, Store, VoteCommon};
use crate::error::Error;

pub async fn tally<S>(store: &mut S, election_id: i32) -> Result<ElectionResult, Error>
where
    S: Store,
{
    let election = ElectionCommon::get(store, election_id).await?.ok_or(Error::ElectionNotFound)?;
    let tallies = VoteCommon::tally(store, election_id).await?;
    let total = VoteCommon::count(
        store,
        VoteQuery {
            election_id_eq: Some(election_id),
            ..default::default()
        },
    )
    .await?;
    Ok(ElectionResult {
        election_id,
        title: election.title,
        position: election.position,
        tallies,
        total,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::{candidate::Create as CandidateCreate, common::parse_datetime, election::ElectionCreate};
    use crate::core::services::{candidate::add_candidate, candidate::test::MemoryUploader, election::publish_election, vote::cast_vote};
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_tally_includes_zero_vote_candidates() {
        let mut store = MemoryStore::new();
        let mut uploader = MemoryUploader::default();
        let eid = publish_election(
            &mut store,
            ElectionCreate {
                title: "Sports Secretary".into(),
                position: "Secretary".into(),
                start_time: parse_datetime("2026-03-01T09:00").unwrap(),
                end_time: parse_datetime("2026-03-01T17:00").unwrap(),
                dept: "CS".into(),
            },
        )
        .await
        .unwrap();
        let mut ids = Vec::new();
        for name in ["A", "B"] {
            let c = CandidateCreate {
                name: name.into(),
                dept: "CS".into(),
                roll_no: name.into(),
                photo: None,
            };
            ids.push(add_candidate(&mut store, &mut uploader, eid, c).await.unwrap());
        }
        cast_vote(&mut store, 1, "CS", eid, Some(ids[0])).await.unwrap();
        cast_vote(&mut store, 2, "CS", eid, Some(ids[0])).await.unwrap();

        let result = tally(&mut store, eid).await.unwrap();
        let mut pairs: Vec<(String, i64)> = result.tallies.iter().map(|t| (t.name.clone(), t.votes)).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("A".to_owned(), 2), ("B".to_owned(), 0)]);
        assert_eq!(result.total, 2);
        assert_eq!(result.total, result.tallies.iter().map(|t| t.votes).sum::<i64>());
        assert_eq!(result.title, "Sports Secretary");
    }

    #[tokio::test]
    async fn test_tally_unknown_election() {
        let mut store = MemoryStore::new();
        assert!(matches!(tally(&mut store, 7).await, Err(Error::ElectionNotFound)));
    }
}
