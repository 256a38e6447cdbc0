use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use image::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input file not found or unreadable: {path}")]
    MissingInput { path: PathBuf },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("missing {kind} model; provide {flag} or set ${env}")]
    MissingModel {
        kind: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("failed to load model {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    #[error("face embedding backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("no face detected in {path}")]
    NoFaceDetected { path: PathBuf },

    #[error("failed to read signature file {path}: {source}")]
    SignatureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("signature file {path} is invalid: {message}")]
    InvalidSignatureFile { path: PathBuf, message: String },

    #[error("failed to write signature output {path}: {source}")]
    SignatureWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read blocklist file {path}: {source}")]
    BlocklistRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::MissingInput { .. } => ExitCode::from(2),
            AppError::ImageDecode { .. } => ExitCode::from(2),
            AppError::MissingModel { .. } => ExitCode::from(2),
            AppError::ModelLoad { .. } => ExitCode::from(2),
            AppError::BackendUnavailable(_) => ExitCode::from(2),
            AppError::NoFaceDetected { .. } => ExitCode::from(3),
            AppError::SignatureRead { .. } => ExitCode::from(2),
            AppError::InvalidSignatureFile { .. } => ExitCode::from(2),
            AppError::BlocklistRead { .. } => ExitCode::from(2),
            AppError::ConfigRead { .. } => ExitCode::from(2),
            AppError::ConfigParse { .. } => ExitCode::from(2),
            _ => ExitCode::from(1),
        }
    }

    pub fn human_message(&self) -> String {
        self.to_string()
    }
}

pub type AppResult<T> = Result<T, AppError>;
