use crate::core::models::Photo;
use crate::error::Error;

pub trait Uploader {
    /// Stores the file and returns the name it is referenced by.
    async fn put(&mut self, photo: Photo) -> Result<String, Error>;
    async fn delete(&mut self, name: &str) -> Result<(), Error>;
}

/// Reduces a client supplied filename to a single safe path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");
    let joined = base
        .split_whitespace()
        .map(|part| part.chars().filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')).collect::<String>())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    joined.trim_start_matches(|c| c == '.' || c == '_').trim_end_matches(|c| c == '.' || c == '_').to_owned()
}

#[cfg(test)]
mod test {
    use super::sanitize_filename;

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo_1.png");
        assert_eq!(sanitize_filename("Ünïcode.jpg"), "ncode.jpg");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }
}
