use crate::core::tokener::{Payload, Tokener};
use crate::error::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// HS256 signer; keys are derived once from the shared secret.
#[derive(Clone)]
pub struct JWT {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JWT {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl<P> Tokener<P> for JWT
where
    P: Payload,
{
    fn sign(&self, payload: &P) -> Result<String, Error> {
        Ok(encode(&Header::new(Algorithm::HS256), payload, &self.encoding)?)
    }

    fn verify(&self, token: &str) -> Result<P, Error> {
        Ok(decode::<P>(token, &self.decoding, &self.validation)?.claims)
    }
}
