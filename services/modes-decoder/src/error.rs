//! Error types for the fallible edges of the decoder

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown sample format '{0}' (expected cu8 or f32)")]
    UnknownSampleFormat(String),

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Failures opening or reading a sample source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to open sample file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read samples: {0}")]
    Read(#[from] io::Error),
}
