use std::path::Path;

#[cfg(feature = "dlib")]
use facecheck_core::faces::{dlib_extractor, FaceModelConfig};
use facecheck_core::faces::FaceSignature;
#[cfg(feature = "dlib")]
use facecheck_core::Verifier;
use facecheck_core::{SimulatedVerifier, Verify};
use facecheck_config::{BackendKind, ResolvedConfig};
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};

pub type DynVerifier = Box<dyn Verify>;

#[cfg(feature = "dlib")]
fn model_config(config: &ResolvedConfig) -> FaceModelConfig {
    FaceModelConfig {
        landmark_model: config.landmark_model.clone(),
        encoder_model: config.encoder_model.clone(),
    }
}

/// Builds the verifier once for the process. Falls back to simulation when the
/// real backend cannot be constructed and the configuration allows it.
pub fn build_verifier(config: &ResolvedConfig) -> AppResult<DynVerifier> {
    build_verifier_with(config, build_real_verifier)
}

pub fn build_verifier_with(
    config: &ResolvedConfig,
    build_real: impl Fn(&ResolvedConfig) -> AppResult<DynVerifier>,
) -> AppResult<DynVerifier> {
    match config.backend {
        BackendKind::Simulated => Ok(simulated(config)),
        BackendKind::Dlib => match build_real(config) {
            Ok(verifier) => Ok(verifier),
            Err(err) if config.fallback_to_simulation => {
                warn!(error = %err, "face backend unavailable");
                Ok(simulated(config))
            }
            Err(err) => Err(err),
        },
    }
}

fn simulated(config: &ResolvedConfig) -> DynVerifier {
    info!(
        configured = %config.backend,
        "SIMULATION MODE: verdicts use a random signature and never compare faces"
    );
    Box::new(SimulatedVerifier::new(config.simulation_delay))
}

#[cfg(feature = "dlib")]
fn build_real_verifier(config: &ResolvedConfig) -> AppResult<DynVerifier> {
    let extractor = dlib_extractor(&model_config(config), config.jitters)?;
    Ok(Box::new(Verifier::new(extractor)))
}

#[cfg(not(feature = "dlib"))]
fn build_real_verifier(_config: &ResolvedConfig) -> AppResult<DynVerifier> {
    Err(unavailable())
}

#[cfg(feature = "dlib")]
pub fn extract_signature(config: &ResolvedConfig, image: &Path) -> AppResult<FaceSignature> {
    dlib_extractor(&model_config(config), config.jitters)?.try_extract(image)
}

#[cfg(not(feature = "dlib"))]
pub fn extract_signature(_config: &ResolvedConfig, _image: &Path) -> AppResult<FaceSignature> {
    Err(unavailable())
}

#[cfg(not(feature = "dlib"))]
fn unavailable() -> AppError {
    AppError::BackendUnavailable("built without the `dlib` feature".into())
}
