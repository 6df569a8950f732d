use serde::Serialize;
use sqlx::FromRow;

use super::{candidate::Candidate, election::Election};

#[derive(Debug, Clone)]
pub struct Insert {
    pub student_id: i32,
    pub election_id: i32,
    pub candidate_id: i32,
}

#[derive(Debug, Default)]
pub struct Query {
    pub student_id_eq: Option<i32>,
    pub election_id_eq: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Tally {
    pub candidate_id: i32,
    pub name: String,
    pub votes: i64,
}

#[derive(Debug, Serialize)]
pub struct ElectionResult {
    pub election_id: i32,
    pub title: String,
    pub position: String,
    pub tallies: Vec<Tally>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct Ballot {
    pub election: Election,
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    Recorded,
    NoSelection,
}
