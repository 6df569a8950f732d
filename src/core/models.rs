pub mod candidate;
pub mod common;
pub mod election;
pub mod photo;
pub mod user;
pub mod vote;

pub use photo::Photo;
