use std::sync::{Arc, Mutex};

use itertools::Itertools;

use crate::core::models::{
    candidate::{Candidate, Insert as CandidateInsert, Query as CandidateQuery},
    election::{Election, Insert as ElectionInsert, Query as ElectionQuery},
    user::{Insert as UserInsert, Query as UserQuery, Role, User},
    vote::{Insert as VoteInsert, Query as VoteQuery, Tally},
};
use crate::core::ports::repository::{CandidateCommon, Common, ElectionCommon, Manager, Store, TxStore, UserCommon, VoteCommon};
use crate::error::Error;

#[derive(Debug, Clone)]
pub struct VoteRow {
    pub id: i32,
    pub student_id: i32,
    pub election_id: i32,
    pub candidate_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct State {
    pub users: Vec<User>,
    pub elections: Vec<Election>,
    pub candidates: Vec<Candidate>,
    pub votes: Vec<VoteRow>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store double with the same uniqueness rules as the schema.
///
/// `begin` stages a copy of the shared state; `commit` publishes it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<State>>,
    staged: Option<State>,
    fail_on: Option<&'static str>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the named operation fail with a database error.
    pub fn fail_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn begin(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            staged: Some(self.snapshot()),
            fail_on: self.fail_on,
        }
    }

    pub fn snapshot(&self) -> State {
        self.shared.lock().unwrap().clone()
    }

    fn check(&self, op: &str) -> Result<(), Error> {
        match self.fail_on {
            Some(f) if f == op => Err(Error::DatabaseError(sqlx::Error::Protocol(format!("injected failure in {}", op)))),
            _ => Ok(()),
        }
    }

    fn with<R>(&mut self, f: impl FnOnce(&mut State) -> R) -> R {
        match &mut self.staged {
            Some(state) => f(state),
            None => f(&mut self.shared.lock().unwrap()),
        }
    }
}

fn to_user(id: i32, u: UserInsert) -> User {
    User {
        id,
        roll_no: u.roll_no,
        fullname: u.fullname,
        email: u.email,
        dept: u.dept,
        password: u.password,
        salt: u.salt,
        role: u.role.as_str().to_owned(),
        is_approved: u.is_approved,
    }
}

impl UserCommon for MemoryStore {
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        self.check("user.insert")?;
        self.with(|s| {
            if s.users.iter().any(|u| u.roll_no == user.roll_no) {
                return Err(Error::DuplicateRollNumber);
            }
            let id = s.next_id();
            s.users.push(to_user(id, user));
            Ok(id)
        })
    }

    async fn insert_if_absent(&mut self, user: UserInsert) -> Result<bool, Error> {
        match UserCommon::insert(self, user).await {
            Ok(_) => Ok(true),
            Err(Error::DuplicateRollNumber) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.with(|s| s.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn get_by_roll_no(&mut self, roll_no: &str) -> Result<Option<User>, Error> {
        Ok(self.with(|s| s.users.iter().find(|u| u.roll_no == roll_no).cloned()))
    }

    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, Error> {
        let excluded = query.role_ne.map(|r| r.as_str());
        Ok(self.with(|s| {
            s.users
                .iter()
                .filter(|u| Some(u.role.as_str()) != excluded)
                .sorted_by_key(|u| (u.is_approved, u.id))
                .cloned()
                .collect()
        }))
    }

    async fn approve(&mut self, id: i32) -> Result<bool, Error> {
        Ok(self.with(|s| match s.users.iter_mut().find(|u| u.id == id && u.role != Role::Admin.as_str()) {
            Some(u) => {
                u.is_approved = true;
                true
            }
            None => false,
        }))
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        self.check("user.delete")?;
        Ok(self.with(|s| {
            let before = s.users.len();
            s.users.retain(|u| u.id != id || u.role == Role::Admin.as_str());
            let deleted = s.users.len() < before;
            if deleted {
                s.votes.retain(|v| v.student_id != id);
            }
            deleted
        }))
    }
}

impl ElectionCommon for MemoryStore {
    async fn insert(&mut self, election: ElectionInsert) -> Result<i32, Error> {
        Ok(self.with(|s| {
            let id = s.next_id();
            s.elections.push(Election {
                id,
                title: election.title,
                position: election.position,
                dept: election.dept,
                start_time: election.start_time,
                end_time: election.end_time,
            });
            id
        }))
    }

    async fn get(&mut self, id: i32) -> Result<Option<Election>, Error> {
        Ok(self.with(|s| s.elections.iter().find(|e| e.id == id).cloned()))
    }

    async fn query(&mut self, query: ElectionQuery) -> Result<Vec<Election>, Error> {
        Ok(self.with(|s| {
            s.elections
                .iter()
                .filter(|e| query.dept_eq.as_ref().map_or(true, |d| &e.dept == d))
                .sorted_by_key(|e| -e.id)
                .cloned()
                .collect()
        }))
    }

    async fn delete(&mut self, id: i32) -> Result<bool, Error> {
        self.check("election.delete")?;
        self.with(|s| {
            if s.candidates.iter().any(|c| c.election_id == id) || s.votes.iter().any(|v| v.election_id == id) {
                return Err(Error::DatabaseError(sqlx::Error::Protocol("foreign key violation".into())));
            }
            let before = s.elections.len();
            s.elections.retain(|e| e.id != id);
            Ok(s.elections.len() < before)
        })
    }
}

impl CandidateCommon for MemoryStore {
    async fn insert(&mut self, candidate: CandidateInsert) -> Result<i32, Error> {
        self.check("candidate.insert")?;
        self.with(|s| {
            if !s.elections.iter().any(|e| e.id == candidate.election_id) {
                return Err(Error::DatabaseError(sqlx::Error::Protocol("foreign key violation".into())));
            }
            let id = s.next_id();
            s.candidates.push(Candidate {
                id,
                election_id: candidate.election_id,
                name: candidate.name,
                dept: candidate.dept,
                roll_no: candidate.roll_no,
                photo: candidate.photo,
            });
            Ok(id)
        })
    }

    async fn get(&mut self, id: i32) -> Result<Option<Candidate>, Error> {
        Ok(self.with(|s| s.candidates.iter().find(|c| c.id == id).cloned()))
    }

    async fn query(&mut self, query: CandidateQuery) -> Result<Vec<Candidate>, Error> {
        Ok(self.with(|s| {
            s.candidates
                .iter()
                .filter(|c| query.election_id_eq.map_or(true, |id| c.election_id == id))
                .cloned()
                .collect()
        }))
    }

    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error> {
        self.with(|s| {
            let doomed: Vec<i32> = s.candidates.iter().filter(|c| c.election_id == election_id).map(|c| c.id).collect();
            if s.votes.iter().any(|v| doomed.contains(&v.candidate_id)) {
                return Err(Error::DatabaseError(sqlx::Error::Protocol("foreign key violation".into())));
            }
            s.candidates.retain(|c| c.election_id != election_id);
            Ok(doomed.len() as u64)
        })
    }
}

impl VoteCommon for MemoryStore {
    async fn insert(&mut self, vote: VoteInsert) -> Result<i32, Error> {
        self.with(|s| {
            if s.votes.iter().any(|v| v.student_id == vote.student_id && v.election_id == vote.election_id) {
                return Err(Error::AlreadyVoted);
            }
            let id = s.next_id();
            s.votes.push(VoteRow {
                id,
                student_id: vote.student_id,
                election_id: vote.election_id,
                candidate_id: vote.candidate_id,
            });
            Ok(id)
        })
    }

    async fn exists(&mut self, student_id: i32, election_id: i32) -> Result<bool, Error> {
        let exists = self.with(|s| s.votes.iter().any(|v| v.student_id == student_id && v.election_id == election_id));
        // Leaves a window between the check and the insert, as a real round trip would.
        tokio::task::yield_now().await;
        Ok(exists)
    }

    async fn voted_election_ids(&mut self, student_id: i32) -> Result<Vec<i32>, Error> {
        Ok(self.with(|s| s.votes.iter().filter(|v| v.student_id == student_id).map(|v| v.election_id).collect()))
    }

    async fn count(&mut self, query: VoteQuery) -> Result<i64, Error> {
        Ok(self.with(|s| {
            s.votes
                .iter()
                .filter(|v| query.student_id_eq.map_or(true, |id| v.student_id == id))
                .filter(|v| query.election_id_eq.map_or(true, |id| v.election_id == id))
                .count() as i64
        }))
    }

    async fn tally(&mut self, election_id: i32) -> Result<Vec<Tally>, Error> {
        Ok(self.with(|s| {
            s.candidates
                .iter()
                .filter(|c| c.election_id == election_id)
                .map(|c| Tally {
                    candidate_id: c.id,
                    name: c.name.clone(),
                    votes: s.votes.iter().filter(|v| v.candidate_id == c.id).count() as i64,
                })
                .collect()
        }))
    }

    async fn delete_by_election(&mut self, election_id: i32) -> Result<u64, Error> {
        self.check("vote.delete_by_election")?;
        Ok(self.with(|s| {
            let before = s.votes.len();
            s.votes.retain(|v| v.election_id != election_id);
            (before - s.votes.len()) as u64
        }))
    }

    async fn delete_by_student(&mut self, student_id: i32) -> Result<u64, Error> {
        Ok(self.with(|s| {
            let before = s.votes.len();
            s.votes.retain(|v| v.student_id != student_id);
            (before - s.votes.len()) as u64
        }))
    }
}

impl Common for MemoryStore {}
impl Store for MemoryStore {}

impl TxStore for MemoryStore {
    async fn commit(mut self) -> Result<(), Error> {
        if let Some(state) = self.staged.take() {
            *self.shared.lock().unwrap() = state;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

/// Every acquired store shares the same state; `begin` stages a copy.
impl Manager for MemoryStore {
    type Store = MemoryStore;
    type TxStore = MemoryStore;

    async fn acquire(&self) -> Result<Self::Store, Error> {
        Ok(self.clone())
    }

    async fn begin(&self) -> Result<Self::TxStore, Error> {
        Ok(MemoryStore::begin(self))
    }
}
