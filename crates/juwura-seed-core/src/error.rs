//! # Error Types
//!
//! Defines `SeedError`, the unified error enum for every fatal failure mode
//! of the generator. Seed acquisition problems are not errors: they are
//! downgraded to a warning and a fresh seed (see `seed::acquire_seed`).

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can occur while generating a seed script.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write seed record {path}: {source}\n  The run is aborted because it could not be replayed without it")]
    SeedRecord {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Identifier block exhausted for {table} in project {project}: only {capacity} ids per project")]
    IdExhausted {
        table: String,
        project: usize,
        capacity: usize,
    },

    #[error("Stage {stage} is scheduled before its dependency {dependency}")]
    StageOrder { stage: String, dependency: String },
}

impl SeedError {
    /// Shorthand for building a `Config` error.
    pub fn config(message: impl Into<String>) -> Self {
        SeedError::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
