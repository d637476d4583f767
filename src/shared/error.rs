use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish "nothing could be collected"
/// from genuine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - a merged BOM was produced
    Success = 0,
    /// No collector produced a BOM for the repository
    UnsupportedRepository = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (checkout failure, file I/O error, bad configuration, etc.)
    ApplicationError = 3,
    /// Interrupted by the operator
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::UnsupportedRepository => write!(f, "Unsupported Repository (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::Interrupted => write!(f, "Interrupted (130)"),
        }
    }
}

/// Application-specific errors for BOM collection and merging.
///
/// The first group mirrors the pipeline's failure taxonomy. Most of those are
/// contained by the orchestrator (logged, then skipped); only
/// `UnsupportedRepository` and `MergeRejected` ever reach a caller.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Root discovery failed for collector '{collector}'\nDetails: {details}")]
    RootDiscoveryFailed { collector: String, details: String },

    #[error("No project roots found for collector '{collector}'")]
    NoRootsFound { collector: String },

    #[error("Bootstrap failed for collector '{collector}' at {root}\nDetails: {details}")]
    BootstrapFailed {
        collector: String,
        root: PathBuf,
        details: String,
    },

    #[error("BOM generation failed for collector '{collector}' at {root}\nDetails: {details}")]
    GenerationFailed {
        collector: String,
        root: PathBuf,
        details: String,
    },

    #[error("Unsupported repository: {path}\n\n💡 Hint: No collector produced a BOM. Check that the repository contains a supported manifest or lockfile")]
    UnsupportedRepository { path: PathBuf },

    #[error("Merge rejected: {reason}")]
    MergeRejected { reason: String },

    #[error("Unknown BOM format: '{requested}'\n\n💡 Hint: Supported formats are 'json' and 'xml'")]
    BadFormat { requested: String },

    #[error("External tool '{program}' failed\nDetails: {details}")]
    ToolFailed { program: String, details: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Failed to check out repository: {repository}\nDetails: {details}\n\n💡 Hint: Verify the repository URL and that git is installed")]
    CheckoutFailed { repository: String, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    ConfigError { message: String, hint: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid repository directory")]
    InvalidProjectPath { path: PathBuf, reason: String },
}

impl SbomError {
    /// Whether this error means the run was interrupted rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SbomError::Cancelled)
    }
}
