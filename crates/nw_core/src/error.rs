use std::path::PathBuf;
use thiserror::Error;

/// The pipeline configuration cannot be run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A single feed could not be retrieved. The pipeline skips the feed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    Status { url: String, status: u16 },
}

/// A feed document could not be read. The feed contributes no items.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Document ended with unclosed elements")]
    UnexpectedEof,

    #[error("Document has no root element")]
    NoRootElement,
}

/// The merged feed could not be written. Fatal for the run.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render feed: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, Error>;
