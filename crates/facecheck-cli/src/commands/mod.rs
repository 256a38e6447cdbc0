use std::any::Any;
use std::process::ExitCode;

use crate::cli::{Commands, OutputMode};
use crate::errors::AppResult;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, mode: OutputMode, verbose: bool) -> AppResult<ExitCode>;
    fn as_any(&self) -> &dyn Any;
}

mod distance;
mod extract;
mod verify;

pub use distance::{run_distance, DistanceHandler, DistanceHandlerDeps, DistanceOutcome};
pub use extract::{ExtractHandler, ExtractHandlerDeps, ExtractionOutcome};
pub use verify::{read_blocklist, VerifyHandler, VerifyHandlerDeps};

impl From<Commands> for Box<dyn CommandHandler> {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Verify(args) => Box::new(VerifyHandler::new(args)),
            Commands::Extract(args) => Box::new(ExtractHandler::new(args)),
            Commands::Distance(args) => Box::new(DistanceHandler::new(args)),
        }
    }
}
