//! Serve-directory backed file access.

use std::io;
use std::path::PathBuf;

use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Errors from file operations. Never leave the files handler.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Files under one serve directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: String,
}

impl FileStore {
    /// Create a store rooted at `directory`. A trailing `/` is appended when
    /// missing so that names concatenate into paths inside the directory.
    pub fn new(directory: impl Into<String>) -> Self {
        let mut directory = directory.into();
        if !directory.ends_with('/') {
            directory.push('/');
        }
        Self { directory }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Path for `name`. The name is not sanitized.
    pub fn resolve(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.directory, name))
    }

    /// False only when the file is known to be absent. Other stat failures
    /// count as present so that the subsequent open reports them.
    pub async fn exists(&self, name: &str) -> bool {
        match fs::metadata(self.resolve(name)).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            _ => true,
        }
    }

    /// Read a file line by line and join the lines without their
    /// terminators (`\n` and a preceding `\r` are dropped).
    pub async fn read_lines(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name);
        if !self.exists(name).await {
            return Err(StorageError::NotFound(path));
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(source) => return Err(StorageError::Open { path, source }),
        };

        let mut reader = BufReader::new(file);
        let mut content = Vec::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(source) => return Err(StorageError::Read { path, source }),
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            content.extend_from_slice(&line);
        }
        Ok(content)
    }

    /// Open (creating if needed, never truncating) and write `data` at the
    /// start of the file.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name);

        let mut options = OpenOptions::new();
        options.write(true).create(true);
        #[cfg(unix)]
        options.mode(0o644);

        let mut file = match options.open(&path).await {
            Ok(file) => file,
            Err(source) => return Err(StorageError::Open { path, source }),
        };

        let written = match file.write_all(data).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        written.map_err(|source| StorageError::Write { path, source })
    }
}
