use std::env;
use std::path::{Path, PathBuf};

#[cfg(feature = "dlib")]
use dlib_face_recognition::{
    FaceDetector, FaceDetectorTrait, FaceEncoderNetwork, FaceEncoderTrait, ImageMatrix,
    LandmarkPredictor, LandmarkPredictorTrait,
};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::faces::signature::FaceSignature;

const LANDMARK_ENV: &str = "DLIB_LANDMARK_MODEL";
const ENCODER_ENV: &str = "DLIB_ENCODER_MODEL";

/// Produces a signature for the face in an image, or `None` when no usable
/// face can be found. Implementations never fail loudly.
pub trait SignatureExtractor {
    fn extract(&self, image: &Path) -> Option<FaceSignature>;
}

impl<T: SignatureExtractor + ?Sized> SignatureExtractor for &T {
    fn extract(&self, image: &Path) -> Option<FaceSignature> {
        (**self).extract(image)
    }
}

impl<T: SignatureExtractor + ?Sized> SignatureExtractor for Box<T> {
    fn extract(&self, image: &Path) -> Option<FaceSignature> {
        (**self).extract(image)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaceModelConfig {
    pub landmark_model: Option<PathBuf>,
    pub encoder_model: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct FaceModelPaths {
    pub landmark: PathBuf,
    pub encoder: PathBuf,
}

pub trait ModelPathResolver {
    fn resolve(&self, config: &FaceModelConfig) -> AppResult<FaceModelPaths>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvModelPathResolver;

impl ModelPathResolver for EnvModelPathResolver {
    fn resolve(&self, config: &FaceModelConfig) -> AppResult<FaceModelPaths> {
        let landmark = config
            .landmark_model
            .clone()
            .or_else(|| env::var(LANDMARK_ENV).ok().map(PathBuf::from))
            .ok_or(AppError::MissingModel {
                kind: "landmark predictor",
                flag: "--landmark-model",
                env: LANDMARK_ENV,
            })?;

        let encoder = config
            .encoder_model
            .clone()
            .or_else(|| env::var(ENCODER_ENV).ok().map(PathBuf::from))
            .ok_or(AppError::MissingModel {
                kind: "face encoding network",
                flag: "--encoder-model",
                env: ENCODER_ENV,
            })?;

        Ok(FaceModelPaths { landmark, encoder })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaceEmbeddingRecord {
    pub bounding_box: BoundingBox,
    pub embedding: Vec<f64>,
}

pub trait FaceEmbeddingBackend {
    fn extract(&self, image: &RgbImage, num_jitters: u32) -> AppResult<Vec<FaceEmbeddingRecord>>;
}

/// Decodes an image from disk and keeps the first face the backend reports.
pub struct ImageSignatureExtractor<B> {
    backend: B,
    jitters: u32,
}

impl<B: FaceEmbeddingBackend> ImageSignatureExtractor<B> {
    pub fn new(backend: B, jitters: u32) -> Self {
        Self { backend, jitters }
    }

    pub fn try_extract(&self, image_path: &Path) -> AppResult<FaceSignature> {
        if !image_path.exists() {
            return Err(AppError::MissingInput {
                path: image_path.to_path_buf(),
            });
        }

        let image = image::open(image_path).map_err(|source| AppError::ImageDecode {
            path: image_path.to_path_buf(),
            source,
        })?;
        let rgb: RgbImage = image.to_rgb8();
        debug!(
            path = %image_path.display(),
            width = rgb.width(),
            height = rgb.height(),
            "loaded image"
        );

        let faces = self.backend.extract(&rgb, self.jitters)?;
        debug!(path = %image_path.display(), faces = faces.len(), "detected faces");

        faces
            .into_iter()
            .find(|face| !face.embedding.is_empty())
            .map(|face| FaceSignature::new(face.embedding))
            .ok_or_else(|| AppError::NoFaceDetected {
                path: image_path.to_path_buf(),
            })
    }
}

impl<B: FaceEmbeddingBackend> SignatureExtractor for ImageSignatureExtractor<B> {
    fn extract(&self, image: &Path) -> Option<FaceSignature> {
        match self.try_extract(image) {
            Ok(signature) => Some(signature),
            Err(err) => {
                debug!(path = %image.display(), error = %err, "signature extraction failed");
                None
            }
        }
    }
}

#[cfg(feature = "dlib")]
pub struct DlibBackend {
    detector: FaceDetector,
    predictor: LandmarkPredictor,
    encoder: FaceEncoderNetwork,
}

#[cfg(feature = "dlib")]
impl DlibBackend {
    pub fn new(models: &FaceModelPaths) -> AppResult<Self> {
        debug!(path = %models.landmark.display(), "loading landmark model");
        let predictor =
            LandmarkPredictor::open(&models.landmark).map_err(|message| AppError::ModelLoad {
                path: models.landmark.clone(),
                message,
            })?;
        debug!(path = %models.encoder.display(), "loading encoder model");
        let encoder =
            FaceEncoderNetwork::open(&models.encoder).map_err(|message| AppError::ModelLoad {
                path: models.encoder.clone(),
                message,
            })?;
        let detector = FaceDetector::new();

        Ok(Self {
            detector,
            predictor,
            encoder,
        })
    }
}

#[cfg(feature = "dlib")]
impl FaceEmbeddingBackend for DlibBackend {
    fn extract(&self, image: &RgbImage, num_jitters: u32) -> AppResult<Vec<FaceEmbeddingRecord>> {
        let matrix = ImageMatrix::from_image(image);
        let locations = self.detector.face_locations(&matrix);

        let mut landmarks = Vec::with_capacity(locations.len());
        for rect in locations.iter() {
            landmarks.push(self.predictor.face_landmarks(&matrix, rect));
        }

        let encodings = self
            .encoder
            .get_face_encodings(&matrix, &landmarks, num_jitters);

        let mut records = Vec::with_capacity(locations.len());
        for (rect, encoding) in locations.iter().zip(encodings.iter()) {
            records.push(FaceEmbeddingRecord {
                bounding_box: BoundingBox {
                    left: rect.left,
                    top: rect.top,
                    right: rect.right,
                    bottom: rect.bottom,
                },
                embedding: encoding.as_ref().to_vec(),
            });
        }

        Ok(records)
    }
}

/// Builds the dlib-backed extractor, resolving model paths from `config` or
/// the environment.
#[cfg(feature = "dlib")]
pub fn dlib_extractor(
    config: &FaceModelConfig,
    jitters: u32,
) -> AppResult<ImageSignatureExtractor<DlibBackend>> {
    let models = EnvModelPathResolver.resolve(config)?;
    let backend = DlibBackend::new(&models)?;
    Ok(ImageSignatureExtractor::new(backend, jitters))
}
