use serde::Serialize;
use sqlx::FromRow;

use super::Photo;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Candidate {
    pub id: i32,
    pub election_id: i32,
    pub name: String,
    pub dept: String,
    pub roll_no: String,
    pub photo: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub election_id: i32,
    pub name: String,
    pub dept: String,
    pub roll_no: String,
    pub photo: String,
}

#[derive(Debug)]
pub struct Create {
    pub name: String,
    pub dept: String,
    pub roll_no: String,
    pub photo: Option<Photo>,
}

#[derive(Debug, Default)]
pub struct Query {
    pub election_id_eq: Option<i32>,
}
