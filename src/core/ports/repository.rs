use crate::core::models::{
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    election::{Election, Insert as ElectionInsert, Query as ElectionQuery},
    user::{Insert as UserInsert, Query as UserQuery, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Tally},
};
use crate::error::Error;

pub trait UserCommon {
    /// Fails with `DuplicateRollNumber` when the roll number is taken.
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
    /// Returns false when a user with the same roll number already exists.
    async fn insert_if_absent(&mut self, user: UserInsert) -> Result<bool, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_roll_no(&mut self, roll_no: &str) -> Result<Option<User>, Error>;
    /// Unapproved accounts first, then by id.
    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, Error>;
    async fn approve(&mut self, id: i32) -> Result<bool, Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
}

pub trait ElectionCommon {
    async fn insert(&mut self, election: ElectionInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Election>, Error>;
    /// Newest first.
    async fn query(&mut self, query: ElectionQuery) -> Result<Vec<Election>, Error>;
    async fn delete(&mut self, id: i32) -> Result<bool, Error>;
}

pub trait CandidateCommon {
    async fn insert(&mut self, candidate: CandidateInsert) -> Result<i32, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<Candidate>, Error>;
    /// Insertion order.
    async fn query(&mut self, query: CandidateQuery) -> Result<Vec<Candidate>, Error>;
    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error>;
}

pub trait VoteCommon {
    /// Fails with `AlreadyVoted` when (student, election) already has a row.
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error>;
    async fn exists(&mut self, student_id: i32, election_id: i32) -> Result<bool, Error>;
    async fn voted_election_ids(&mut self, student_id: i32) -> Result<Vec<i32>, Error>;
    async fn count(&mut self, query: VoteQuery) -> Result<i64, Error>;
    /// One row per candidate of the election, zero-vote candidates included.
    async fn tally(&mut self, election_id: i32) -> Result<Vec<Tally>, Error>;
    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error>;
    async fn delete_by_student(&mut self, student_id: i32) -> Result<u64, Error>;
}

pub trait Common: UserCommon + ElectionCommon + CandidateCommon + VoteCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

/// Hands out stores: a plain connection or a fresh transaction.
pub trait Manager {
    type Store: Store;
    type TxStore: TxStore;
    async fn acquire(&self) -> Result<Self::Store, Error>;
    async fn begin(&self) -> Result<Self::TxStore, Error>;
}
