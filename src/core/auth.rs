use hex::ToHex;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 32;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(SALT_LEN).map(char::from).collect()
}

pub fn verify_password(pass: &str, slt: &str, hashed: &str) -> bool {
    hash_password(pass, slt) == hashed
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let slt = random_salt();
        assert_eq!(slt.len(), SALT_LEN);
        let hashed = hash_password("s3cret", &slt);
        assert!(verify_password("s3cret", &slt, &hashed));
        assert!(!verify_password("S3cret", &slt, &hashed));
    }

    #[test]
    fn test_salt_changes_hash() {
        assert_ne!(hash_password("same", &random_salt()), hash_password("same", &random_salt()));
    }
}
