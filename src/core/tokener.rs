use crate::error::Error;
use serde::{de::DeserializeOwned, Serialize};

/// Claims a token carries; `subject` identifies the account.
pub trait Payload: Serialize + DeserializeOwned {
    fn subject(&self) -> &str;
    fn expires_at(&self) -> i64;
}

pub trait Tokener<P: Payload> {
    fn sign(&self, payload: &P) -> Result<String, Error>;
    /// Rejects tampered and expired tokens.
    fn verify(&self, token: &str) -> Result<P, Error>;
}
