use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::deserialize_datetime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Election {
    pub id: i32,
    pub title: String,
    pub position: String,
    pub dept: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElectionCreate {
    pub title: String,
    pub position: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start_time: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub end_time: NaiveDateTime,
    pub dept: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub title: String,
    pub position: String,
    pub dept: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl From<ElectionCreate> for Insert {
    fn from(c: ElectionCreate) -> Self {
        Self {
            title: c.title.trim().to_owned(),
            position: c.position.trim().to_owned(),
            dept: c.dept.trim().to_owned(),
            start_time: c.start_time,
            end_time: c.end_time,
        }
    }
}

#[derive(Debug, Default)]
pub struct Query {
    pub dept_eq: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardItem {
    #[serde(flatten)]
    pub election: Election,
    pub has_voted: bool,
}
