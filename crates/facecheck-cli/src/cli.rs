use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use facecheck_config::BackendKind;

#[derive(Debug, Parser)]
#[command(
    name = "facecheck",
    about = "Match a selfie against an identity document and a face blocklist",
    version
)]
pub struct Cli {
    /// Emit structured JSON to stdout instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (may be used multiple times)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify that the selfie matches the document and is not blocklisted
    Verify(VerifyArgs),
    /// Extract the face signature of the first face in an image
    Extract(ExtractArgs),
    /// Compute the distance between two signature files
    Distance(DistanceArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// Path to the dlib landmark predictor model (falls back to config, then $DLIB_LANDMARK_MODEL)
    #[arg(long)]
    pub landmark_model: Option<PathBuf>,

    /// Path to the dlib face recognition network (falls back to config, then $DLIB_ENCODER_MODEL)
    #[arg(long)]
    pub encoder_model: Option<PathBuf>,

    /// Number of image jitters to run before encoding
    #[arg(long)]
    pub jitters: Option<u32>,
}

#[derive(Debug, Clone, Args)]
pub struct VerifyArgs {
    /// Selfie image
    pub selfie: PathBuf,

    /// Identity document image
    pub document: PathBuf,

    /// JSON array of blocked signatures (numeric arrays or JSON-encoded strings)
    pub blocklist: Option<String>,

    /// Read the blocklist JSON from a file instead of the command line
    #[arg(long, conflicts_with = "blocklist")]
    pub blocklist_file: Option<PathBuf>,

    /// Override the configured extraction backend (dlib or simulated)
    #[arg(long)]
    pub backend: Option<BackendKind>,

    #[command(flatten)]
    pub models: ModelArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Image containing at least one face
    pub image: PathBuf,

    /// Write the signature JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub models: ModelArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DistanceArgs {
    /// Signature JSON file
    pub lhs: PathBuf,

    /// Signature JSON file to compare against
    pub rhs: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

impl From<bool> for OutputMode {
    fn from(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(self.json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_positional_blocklist() {
        let cli = Cli::try_parse_from([
            "facecheck",
            "--json",
            "verify",
            "selfie.jpg",
            "id.jpg",
            "[[0.1, 0.2]]",
            "--backend",
            "simulated",
        ])
        .unwrap();

        assert!(matches!(cli.output_mode(), OutputMode::Json));
        match cli.command {
            Commands::Verify(args) => {
                assert_eq!(args.selfie, PathBuf::from("selfie.jpg"));
                assert_eq!(args.blocklist.as_deref(), Some("[[0.1, 0.2]]"));
                assert_eq!(args.backend, Some(BackendKind::Simulated));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn blocklist_sources_conflict() {
        let err = Cli::try_parse_from([
            "facecheck",
            "verify",
            "selfie.jpg",
            "id.jpg",
            "[]",
            "--blocklist-file",
            "blocked.json",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn verify_requires_both_images() {
        assert!(Cli::try_parse_from(["facecheck", "verify", "selfie.jpg"]).is_err());
    }
}
