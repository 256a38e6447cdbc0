use std::any::Any;
use std::path::Path;
use std::process::ExitCode;

use facecheck_config::ResolvedConfig;
use facecheck_core::faces::{persist_signature, FaceSignature};
use serde::Serialize;
use tracing::info;

use crate::backend;
use crate::cli::{ExtractArgs, OutputMode};
use crate::commands::CommandHandler;
use crate::config;
use crate::errors::AppResult;
use crate::output::render_extraction;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    pub image_path: String,
    pub output_path: Option<String>,
    pub template_hash: String,
    pub signature: FaceSignature,
}

type ExtractFn = dyn Fn(&ResolvedConfig, &Path) -> AppResult<FaceSignature> + Send + Sync;

pub struct ExtractHandler {
    args: ExtractArgs,
    deps: ExtractHandlerDeps,
}

pub struct ExtractHandlerDeps {
    pub load_config: Box<dyn Fn() -> AppResult<ResolvedConfig> + Send + Sync>,
    pub extract: Box<ExtractFn>,
    pub render: Box<dyn Fn(&ExtractionOutcome, OutputMode) -> AppResult<()> + Send + Sync>,
}

impl ExtractHandlerDeps {
    pub fn new(
        load_config: impl Fn() -> AppResult<ResolvedConfig> + Send + Sync + 'static,
        extract: impl Fn(&ResolvedConfig, &Path) -> AppResult<FaceSignature> + Send + Sync + 'static,
        render: impl Fn(&ExtractionOutcome, OutputMode) -> AppResult<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            load_config: Box::new(load_config),
            extract: Box::new(extract),
            render: Box::new(render),
        }
    }
}

impl Default for ExtractHandlerDeps {
    fn default() -> Self {
        Self::new(
            config::load_config,
            backend::extract_signature,
            render_extraction,
        )
    }
}

impl ExtractHandler {
    pub fn new(args: ExtractArgs) -> Self {
        Self {
            args,
            deps: ExtractHandlerDeps::default(),
        }
    }

    pub fn with_dependencies(args: ExtractArgs, deps: ExtractHandlerDeps) -> Self {
        Self { args, deps }
    }
}

impl CommandHandler for ExtractHandler {
    fn execute(&self, mode: OutputMode, _verbose: bool) -> AppResult<ExitCode> {
        let resolved = config::apply_model_overrides((self.deps.load_config)()?, &self.args.models);
        let signature = (self.deps.extract)(&resolved, &self.args.image)?;

        if let Some(output) = &self.args.output {
            persist_signature(&signature, output)?;
            info!(path = %output.display(), "signature written");
        }

        let outcome = ExtractionOutcome {
            image_path: self.args.image.display().to_string(),
            output_path: self
                .args
                .output
                .as_ref()
                .map(|path| path.display().to_string()),
            template_hash: signature.template_hash(),
            signature,
        };
        (self.deps.render)(&outcome, mode)?;
        Ok(ExitCode::SUCCESS)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
