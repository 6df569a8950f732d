use std::{
    fs::{create_dir_all, remove_file, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::config::DEFAULT_PHOTO;
use crate::core::models::Photo;
use crate::core::uploader::{sanitize_filename, Uploader};
use crate::error::Error;

/// Keeps candidate photos as plain files in one directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    max_bytes: usize,
}

impl LocalStorage {
    pub fn new(path: impl AsRef<Path>, max_bytes: usize) -> Result<Self, Error> {
        create_dir_all(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_owned(),
            max_bytes,
        })
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// `cand_{election}_{token}_{name}`; the token keeps two uploads of the same file apart.
    fn filename(file: &Photo) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut name = sanitize_filename(&file.filename);
        if name.is_empty() {
            name = "photo".into();
        }
        format!("cand_{}_{}_{}", file.election_id, &token[..8], name)
    }
}

impl Uploader for LocalStorage {
    async fn put(&mut self, file: Photo) -> Result<String, Error> {
        if file.content.is_empty() {
            return Err(Error::UploadFailure("empty file".into()));
        }
        if file.content.len() > self.max_bytes {
            return Err(Error::UploadFailure(format!("file exceeds {} bytes", self.max_bytes)));
        }
        let filename = Self::filename(&file);
        write(self.path.join(&filename), file.content).map_err(|e| Error::UploadFailure(e.to_string()))?;
        log::info!("stored candidate photo {}", filename);
        Ok(filename)
    }

    async fn delete(&mut self, name: &str) -> Result<(), Error> {
        if name == DEFAULT_PHOTO || sanitize_filename(name) != name {
            return Ok(());
        }
        match remove_file(self.path.join(name)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
