use std::path::PathBuf;

/// Errors that may occur while loading a pod list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open file `{path}`: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode pod list: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode pod list in file `{path}`: {source}")]
    DecodeFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
