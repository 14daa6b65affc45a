use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = TokenError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed dimension literal `{0}`")]
    MalformedDimension(String),
    #[error("unsupported unit `{0}`, expected px, rem or rpx")]
    UnsupportedUnit(String),
    #[error("token `{name}`: {source}")]
    InToken {
        name: String,
        #[source]
        source: Box<TokenError>,
    },
    #[error("unknown format `{0}`")]
    UnknownFormat(String),
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TokenError {
    pub(crate) fn in_token(self, name: &str) -> Self {
        TokenError::InToken {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| TokenError::Io { path, source }
    }
}
