use std::any::Any;
use std::path::Path;
use std::process::ExitCode;

use facecheck_core::faces::{euclidean_distance, is_same_identity, load_signature};
use serde::Serialize;

use crate::cli::{DistanceArgs, OutputMode};
use crate::commands::CommandHandler;
use crate::errors::AppResult;
use crate::output::render_distance;

/// `distance` is serialized as `null` when the signature lengths differ.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceOutcome {
    pub lhs: String,
    pub rhs: String,
    pub distance: f64,
    pub same_identity: bool,
}

pub fn run_distance(lhs: &Path, rhs: &Path) -> AppResult<DistanceOutcome> {
    let left = load_signature(lhs)?;
    let right = load_signature(rhs)?;
    let distance = euclidean_distance(&left, &right);
    tracing::debug!(distance, "compared signature files");

    Ok(DistanceOutcome {
        lhs: lhs.display().to_string(),
        rhs: rhs.display().to_string(),
        distance,
        same_identity: is_same_identity(&left, &right),
    })
}

pub struct DistanceHandler {
    args: DistanceArgs,
    deps: DistanceHandlerDeps,
}

pub struct DistanceHandlerDeps {
    pub compare: Box<dyn Fn(&Path, &Path) -> AppResult<DistanceOutcome> + Send + Sync>,
    pub render: Box<dyn Fn(&DistanceOutcome, OutputMode) -> AppResult<()> + Send + Sync>,
}

impl DistanceHandlerDeps {
    pub fn new(
        compare: impl Fn(&Path, &Path) -> AppResult<DistanceOutcome> + Send + Sync + 'static,
        render: impl Fn(&DistanceOutcome, OutputMode) -> AppResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            compare: Box::new(compare),
            render: Box::new(render),
        }
    }
}

impl Default for DistanceHandlerDeps {
    fn default() -> Self {
        Self::new(run_distance, render_distance)
    }
}

impl DistanceHandler {
    pub fn new(args: DistanceArgs) -> Self {
        Self {
            args,
            deps: DistanceHandlerDeps::default(),
        }
    }

    pub fn with_dependencies(args: DistanceArgs, deps: DistanceHandlerDeps) -> Self {
        Self { args, deps }
    }
}

impl CommandHandler for DistanceHandler {
    fn execute(&self, mode: OutputMode, _verbose: bool) -> AppResult<ExitCode> {
        let outcome = (self.deps.compare)(&self.args.lhs, &self.args.rhs)?;
        (self.deps.render)(&outcome, mode)?;
        Ok(ExitCode::SUCCESS)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
