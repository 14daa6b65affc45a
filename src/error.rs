use std::{io, path::PathBuf, process::ExitStatus};

use design_tokens_core::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("base font size and base screen width must be positive, got {font_size} and {screen_width}")]
    InvalidUnits { font_size: f64, screen_width: f64 },
}

/// Why a single namespace build failed.
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error(transparent)]
    Engine(#[from] TokenError),
    #[error("failed to start post-build command `{command}`: {source}")]
    PostBuildSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("post-build command `{command}` exited with {status}")]
    PostBuildFailed { command: String, status: ExitStatus },
    #[error("namespace name `{0}` cannot be used as an output directory")]
    InvalidName(String),
    #[error("output directory {} is shared by namespaces {}", .directory.display(), .namespaces.join(", "))]
    OutputConflict {
        directory: PathBuf,
        namespaces: Vec<String>,
    },
    #[error("build task ended unexpectedly: {0}")]
    Unexpected(String),
}
