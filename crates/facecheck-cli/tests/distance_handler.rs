use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use facecheck_cli::cli::{DistanceArgs, OutputMode};
use facecheck_cli::commands::{
    run_distance, CommandHandler, DistanceHandler, DistanceHandlerDeps, DistanceOutcome,
};
use facecheck_cli::errors::AppError;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, values: &[f64]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string(values).unwrap()).unwrap();
    path
}

#[test]
fn close_signatures_are_the_same_identity() {
    let dir = TempDir::new().unwrap();
    let lhs = write(&dir, "a.json", &[0.0, 0.0, 0.0]);
    let rhs = write(&dir, "b.json", &[0.3, 0.4, 0.0]);

    let outcome = run_distance(&lhs, &rhs).unwrap();
    assert!((outcome.distance - 0.5).abs() < 1e-12);
    assert!(outcome.same_identity);
}

#[test]
fn unequal_lengths_are_never_the_same_identity() {
    let dir = TempDir::new().unwrap();
    let lhs = write(&dir, "a.json", &[0.0, 0.0]);
    let rhs = write(&dir, "b.json", &[0.0, 0.0, 0.0]);

    let outcome = run_distance(&lhs, &rhs).unwrap();
    assert!(outcome.distance.is_infinite());
    assert!(!outcome.same_identity);

    let json = serde_json::to_value(&outcome).unwrap();
    assert!(json["distance"].is_null());
}

#[test]
fn unreadable_signature_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let lhs = write(&dir, "a.json", &[0.1]);
    let missing = dir.path().join("missing.json");

    let err = run_distance(&lhs, &missing).unwrap_err();
    assert!(matches!(err, AppError::SignatureRead { .. }));
}

#[test]
fn handler_renders_the_comparison() {
    let rendered = Arc::new(Mutex::new(0));
    let deps = DistanceHandlerDeps::new(
        |lhs: &Path, rhs: &Path| {
            Ok(DistanceOutcome {
                lhs: lhs.display().to_string(),
                rhs: rhs.display().to_string(),
                distance: 0.9,
                same_identity: false,
            })
        },
        {
            let rendered = Arc::clone(&rendered);
            move |outcome: &DistanceOutcome, _mode| {
                assert_eq!(outcome.lhs, "a.json");
                *rendered.lock().unwrap() += 1;
                Ok(())
            }
        },
    );

    let handler = DistanceHandler::with_dependencies(
        DistanceArgs {
            lhs: PathBuf::from("a.json"),
            rhs: PathBuf::from("b.json"),
        },
        deps,
    );
    assert_eq!(
        handler.execute(OutputMode::Human, false).unwrap(),
        ExitCode::SUCCESS
    );
    assert_eq!(*rendered.lock().unwrap(), 1);
}
