use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Error::Read { path, .. } | Error::Write { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Read { source, .. } | Error::Write { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
