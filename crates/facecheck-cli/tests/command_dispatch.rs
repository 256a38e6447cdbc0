use std::path::PathBuf;

use facecheck_cli::cli::{Commands, DistanceArgs, ExtractArgs, ModelArgs, VerifyArgs};
use facecheck_cli::commands::{CommandHandler, DistanceHandler, ExtractHandler, VerifyHandler};

fn assert_dispatch<T: 'static>(command: Commands)
where
    T: CommandHandler,
{
    let handler: Box<dyn CommandHandler> = command.into();
    assert!(handler.as_any().is::<T>());
}

#[test]
fn verify_command_dispatches_verify_handler() {
    assert_dispatch::<VerifyHandler>(Commands::Verify(VerifyArgs {
        selfie: PathBuf::from("selfie.jpg"),
        document: PathBuf::from("id.jpg"),
        blocklist: None,
        blocklist_file: None,
        backend: None,
        models: ModelArgs::default(),
    }));
}

#[test]
fn extract_command_dispatches_extract_handler() {
    assert_dispatch::<ExtractHandler>(Commands::Extract(ExtractArgs {
        image: PathBuf::from("selfie.jpg"),
        output: None,
        models: ModelArgs::default(),
    }));
}

#[test]
fn distance_command_dispatches_distance_handler() {
    assert_dispatch::<DistanceHandler>(Commands::Distance(DistanceArgs {
        lhs: PathBuf::from("a.json"),
        rhs: PathBuf::from("b.json"),
    }));
}
