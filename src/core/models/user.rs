use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    /// Landing page after login.
    pub fn home(&self) -> &'static str {
        match self {
            Role::Student => "/student_dashboard",
            Role::Admin => "/admin_dashboard",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(Error::BusinessError(format!("invalid role({})", s))),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub roll_no: String,
    pub fullname: String,
    pub email: String,
    pub dept: String,
    pub password: String,
    pub salt: String,
    pub role: String,
    pub is_approved: bool,
}

impl User {
    pub fn role(&self) -> Result<Role, Error> {
        self.role.parse()
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub roll_no: String,
    pub fullname: String,
    pub email: String,
    pub dept: String,
    pub password: String,
    pub salt: String,
    pub role: Role,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Register {
    pub roll_no: String,
    pub fullname: String,
    pub email: String,
    pub dept: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Query {
    pub role_ne: Option<Role>,
}

/// A user record with the credential columns stripped.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i32,
    pub roll_no: String,
    pub fullname: String,
    pub email: String,
    pub dept: String,
    pub role: String,
    pub is_approved: bool,
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            roll_no: u.roll_no,
            fullname: u.fullname,
            email: u.email,
            dept: u.dept,
            role: u.role,
            is_approved: u.is_approved,
        }
    }
}
