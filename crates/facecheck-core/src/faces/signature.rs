use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{AppError, AppResult};

/// Number of values produced by the dlib face encoder network.
pub const SIGNATURE_LEN: usize = 128;

const TEMPLATE_HASH_PREFIX: usize = 16;

/// Numeric face embedding. Serialises as a bare JSON array of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceSignature(Vec<f64>);

impl FaceSignature {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Lookup fingerprint for indexing stored signatures: SHA-256 over the
    /// JSON array of the first 16 values rounded to four decimals.
    ///
    /// Near-identical faces do not share a hash; this is an index key, not a
    /// matching criterion.
    pub fn template_hash(&self) -> String {
        let rounded: Vec<f64> = self
            .0
            .iter()
            .take(TEMPLATE_HASH_PREFIX)
            .map(|value| (value * 10_000.0).round() / 10_000.0)
            .collect();
        // A Vec<f64> of finite values always serialises.
        let encoded = serde_json::to_string(&rounded).unwrap_or_default();
        hex::encode(Sha256::digest(encoded.as_bytes()))
    }
}

impl Deref for FaceSignature {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn load_signature(path: &Path) -> AppResult<FaceSignature> {
    let file = File::open(path).map_err(|source| AppError::SignatureRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let signature: FaceSignature =
        serde_json::from_reader(reader).map_err(|err| AppError::InvalidSignatureFile {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    if signature.is_empty() {
        return Err(AppError::InvalidSignatureFile {
            path: path.to_path_buf(),
            message: "signature contains no values".into(),
        });
    }
    Ok(signature)
}

pub fn persist_signature(signature: &FaceSignature, output_path: &Path) -> AppResult<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|err| AppError::SignatureWrite {
            path: parent.to_path_buf(),
            source: err,
        })?;
    }

    let file = File::create(output_path).map_err(|err| AppError::SignatureWrite {
        path: output_path.to_path_buf(),
        source: err,
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, signature)?;
    writer.flush().map_err(|err| AppError::SignatureWrite {
        path: output_path.to_path_buf(),
        source: err,
    })?;

    Ok(())
}
