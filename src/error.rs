//! Error handling for postgen.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

/// Custom error types for postgen operations.
///
/// This enum represents all possible errors that can occur while reconciling
/// a generated project. It implements the standard Error trait through
/// thiserror's derive macro.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A path scheduled for removal could not be deleted.
    #[error("Failed to remove '{path}': {source}.")]
    RemoveError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A regenerated artifact could not be written.
    #[error("Failed to write '{path}': {source}.")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission bits of a script could not be read or updated.
    #[error("Failed to update permissions of '{path}': {source}.")]
    PermissionError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors that occur while loading the context or the manifest
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents validation failures in options or rendered paths
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// Represents errors that occur during path or fragment rendering
    #[error("Template error: {0}.")]
    TemplateError(#[from] minijinja::Error),

    /// Wraps any failure with the pipeline stage it happened in.
    #[error("{stage} failed: {source}")]
    StageError {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// Sentinel paths survived the run (reported only in strict mode).
    #[error("Leftover placeholder paths: {}.", display_paths(.0))]
    LeftoverSentinels(Vec<PathBuf>),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Convenience type alias for Results with postgen's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
