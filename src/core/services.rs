pub mod candidate;
pub mod election;
pub mod result;
pub mod user;
pub mod vote;
