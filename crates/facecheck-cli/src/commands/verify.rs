use std::any::Any;
use std::fs;
use std::process::ExitCode;

use facecheck_config::ResolvedConfig;
use facecheck_core::faces::{parse_blocklist, BlocklistEntry};
use facecheck_core::{Verdict, VerificationRequest, Verify};
use tracing::info;

use crate::backend::{self, DynVerifier};
use crate::cli::{OutputMode, VerifyArgs};
use crate::commands::CommandHandler;
use crate::config;
use crate::errors::{AppError, AppResult};
use crate::output::render_verdict;

pub struct VerifyHandler {
    args: VerifyArgs,
    deps: VerifyHandlerDeps,
}

pub struct VerifyHandlerDeps {
    pub load_config: Box<dyn Fn() -> AppResult<ResolvedConfig> + Send + Sync>,
    pub build_verifier: Box<dyn Fn(&ResolvedConfig) -> AppResult<DynVerifier> + Send + Sync>,
    pub render: Box<dyn Fn(&Verdict, OutputMode) -> AppResult<()> + Send + Sync>,
}

impl VerifyHandlerDeps {
    pub fn new(
        load_config: impl Fn() -> AppResult<ResolvedConfig> + Send + Sync + 'static,
        build_verifier: impl Fn(&ResolvedConfig) -> AppResult<DynVerifier> + Send + Sync + 'static,
        render: impl Fn(&Verdict, OutputMode) -> AppResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            load_config: Box::new(load_config),
            build_verifier: Box::new(build_verifier),
            render: Box::new(render),
        }
    }
}

impl Default for VerifyHandlerDeps {
    fn default() -> Self {
        Self::new(config::load_config, backend::build_verifier, render_verdict)
    }
}

impl VerifyHandler {
    pub fn new(args: VerifyArgs) -> Self {
        Self {
            args,
            deps: VerifyHandlerDeps::default(),
        }
    }

    pub fn with_dependencies(args: VerifyArgs, deps: VerifyHandlerDeps) -> Self {
        Self { args, deps }
    }
}

impl CommandHandler for VerifyHandler {
    fn execute(&self, mode: OutputMode, _verbose: bool) -> AppResult<ExitCode> {
        let mut resolved = (self.deps.load_config)()?;
        if let Some(backend) = self.args.backend {
            resolved.backend = backend;
        }
        let resolved = config::apply_model_overrides(resolved, &self.args.models);

        let blocklist = read_blocklist(&self.args)?;
        let verifier = (self.deps.build_verifier)(&resolved)?;
        let request = VerificationRequest::new(&self.args.selfie, &self.args.document, &blocklist);
        let verdict = verifier.verify(&request);
        info!(
            status = %verdict.status,
            blocklist_entries = blocklist.len(),
            "verification finished"
        );

        (self.deps.render)(&verdict, mode)?;
        Ok(ExitCode::SUCCESS)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Collects the blocklist from the positional JSON argument or from
/// `--blocklist-file`. Only an unreadable file is an error; malformed JSON
/// yields an empty blocklist.
pub fn read_blocklist(args: &VerifyArgs) -> AppResult<Vec<BlocklistEntry>> {
    if let Some(raw) = &args.blocklist {
        return Ok(parse_blocklist(raw));
    }
    match &args.blocklist_file {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| AppError::BlocklistRead {
                path: path.clone(),
                source,
            })?;
            Ok(parse_blocklist(&raw))
        }
        None => Ok(Vec::new()),
    }
}
