use std::error::Error;
use std::io::{self, Write};

use facecheck_core::Verdict;
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputMode;
use crate::commands::{DistanceOutcome, ExtractionOutcome};
use crate::errors::{AppError, AppResult};

fn write_json<T: Serialize>(payload: &T) -> AppResult<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let payload = serde_json::to_string(payload)?;
    handle.write_all(payload.as_bytes())?;
    handle.write_all(b"\n")?;
    Ok(())
}

pub fn render_verdict(verdict: &Verdict, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            println!("{}: {}", verdict.status, verdict.message);
            if let Some(encoding) = &verdict.encoding {
                println!("Template hash: {}", encoding.template_hash());
            }
        }
        OutputMode::Json => write_json(verdict)?,
    }
    Ok(())
}

pub fn render_extraction(outcome: &ExtractionOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            println!(
                "Signature extracted from {} ({} values)",
                outcome.image_path,
                outcome.signature.len()
            );
            println!("Template hash: {}", outcome.template_hash);
            match &outcome.output_path {
                Some(path) => println!("Saved to {path}"),
                None => println!("{}", serde_json::to_string(&outcome.signature)?),
            }
        }
        OutputMode::Json => write_json(outcome)?,
    }
    Ok(())
}

pub fn render_distance(outcome: &DistanceOutcome, mode: OutputMode) -> AppResult<()> {
    match mode {
        OutputMode::Human => {
            if outcome.distance.is_finite() {
                println!("Distance: {:.4}", outcome.distance);
            } else {
                println!("Distance: infinite (signature lengths differ)");
            }
            let verdict = if outcome.same_identity {
                "same identity"
            } else {
                "different identity"
            };
            println!("{} vs {}: {verdict}", outcome.lhs, outcome.rhs);
        }
        OutputMode::Json => write_json(outcome)?,
    }
    Ok(())
}

pub fn render_error(err: &AppError, mode: OutputMode) {
    match mode {
        OutputMode::Human => {
            eprintln!("error: {}", err.human_message());
        }
        OutputMode::Json => {
            let payload = json!({
                "status": "error",
                "message": err.human_message(),
                "encoding": null,
            });
            if let Ok(json) = serde_json::to_string(&payload) {
                println!("{json}");
            }
        }
    }
    if let Some(source) = err.source() {
        eprintln!("cause: {source}");
    }
}
