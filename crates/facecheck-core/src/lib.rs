pub mod errors;
pub mod faces;
pub mod simulate;
pub mod verify;

pub use errors::{AppError, AppResult};
pub use simulate::SimulatedVerifier;
pub use verify::{Verdict, VerificationRequest, VerificationStatus, Verifier, Verify};
