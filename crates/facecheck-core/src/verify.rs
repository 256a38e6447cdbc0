//! Selfie-versus-document verification.
//!
//! [`Verifier`] walks a fixed sequence of checks and stops at the first one
//! that decides the outcome: input presence, face extraction for the selfie
//! and then the document, the blocklist scan, and finally the identity
//! distance between the two signatures.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::faces::{
    check_blocklist, euclidean_distance, BlocklistEntry, FaceSignature, SignatureExtractor,
    BLOCKLIST_THRESHOLD, IDENTITY_THRESHOLD,
};

pub const SELFIE_MISSING_MESSAGE: &str = "Selfie not found";
pub const DOCUMENT_MISSING_MESSAGE: &str = "Document not found";
pub const NO_FACE_MESSAGE: &str = "No face detected in the selfie";
pub const NO_FACE_ID_MESSAGE: &str = "No face detected in the document";
pub const BLOCKED_MESSAGE: &str = "Account suspended due to previous violations";
pub const VERIFIED_MESSAGE: &str = "Biometric verification successful";
pub const MISMATCH_MESSAGE: &str = "Face does not match the document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Error,
    NoFace,
    NoFaceId,
    Blocked,
    Verified,
    Mismatch,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Error => "error",
            VerificationStatus::NoFace => "no_face",
            VerificationStatus::NoFaceId => "no_face_id",
            VerificationStatus::Blocked => "blocked",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one verification.
///
/// `encoding` carries the selfie signature only for `blocked` and `verified`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub status: VerificationStatus,
    pub message: String,
    pub encoding: Option<FaceSignature>,
}

impl Verdict {
    pub fn new(
        status: VerificationStatus,
        message: impl Into<String>,
        encoding: Option<FaceSignature>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            encoding,
        }
    }

    fn without_encoding(status: VerificationStatus, message: &str) -> Self {
        Self::new(status, message, None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    pub selfie: &'a Path,
    pub document: &'a Path,
    pub blocklist: &'a [BlocklistEntry],
}

impl<'a> VerificationRequest<'a> {
    pub fn new(selfie: &'a Path, document: &'a Path, blocklist: &'a [BlocklistEntry]) -> Self {
        Self {
            selfie,
            document,
            blocklist,
        }
    }
}

pub trait Verify {
    fn verify(&self, request: &VerificationRequest<'_>) -> Verdict;
}

/// Returns the `error` verdict for the first input image that does not exist.
pub(crate) fn check_inputs(request: &VerificationRequest<'_>) -> Option<Verdict> {
    if !request.selfie.exists() {
        debug!(path = %request.selfie.display(), "selfie image missing");
        return Some(Verdict::without_encoding(
            VerificationStatus::Error,
            SELFIE_MISSING_MESSAGE,
        ));
    }
    if !request.document.exists() {
        debug!(path = %request.document.display(), "document image missing");
        return Some(Verdict::without_encoding(
            VerificationStatus::Error,
            DOCUMENT_MISSING_MESSAGE,
        ));
    }
    None
}

pub struct Verifier<E> {
    extractor: E,
}

impl<E: SignatureExtractor> Verifier<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// An empty signature from the extractor counts as no face.
    fn extract_face(&self, image: &Path) -> Option<FaceSignature> {
        self.extractor
            .extract(image)
            .filter(|signature| !signature.is_empty())
    }
}

impl<E: SignatureExtractor> Verify for Verifier<E> {
    fn verify(&self, request: &VerificationRequest<'_>) -> Verdict {
        if let Some(verdict) = check_inputs(request) {
            return verdict;
        }

        let Some(selfie) = self.extract_face(request.selfie) else {
            return Verdict::without_encoding(VerificationStatus::NoFace, NO_FACE_MESSAGE);
        };

        let Some(document) = self.extract_face(request.document) else {
            return Verdict::without_encoding(VerificationStatus::NoFaceId, NO_FACE_ID_MESSAGE);
        };

        let blocklist_match =
            check_blocklist(Some(selfie.values()), request.blocklist, BLOCKLIST_THRESHOLD);
        if blocklist_match.is_match {
            warn!(
                evidence = blocklist_match.evidence.as_deref().unwrap_or_default(),
                entries = request.blocklist.len(),
                "selfie matched a blocklisted signature"
            );
            return Verdict::new(VerificationStatus::Blocked, BLOCKED_MESSAGE, Some(selfie));
        }

        let distance = euclidean_distance(&selfie, &document);
        if distance <= IDENTITY_THRESHOLD {
            info!(distance, "selfie matches document");
            Verdict::new(VerificationStatus::Verified, VERIFIED_MESSAGE, Some(selfie))
        } else {
            info!(distance, "selfie does not match document");
            Verdict::without_encoding(VerificationStatus::Mismatch, MISMATCH_MESSAGE)
        }
    }
}

impl<T: Verify + ?Sized> Verify for Box<T> {
    fn verify(&self, request: &VerificationRequest<'_>) -> Verdict {
        (**self).verify(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    use tempfile::TempDir;

    #[derive(Default)]
    struct MapExtractor {
        signatures: HashMap<PathBuf, FaceSignature>,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl MapExtractor {
        fn with(mut self, path: &Path, values: Vec<f64>) -> Self {
            self.signatures
                .insert(path.to_path_buf(), FaceSignature::new(values));
            self
        }
    }

    impl SignatureExtractor for MapExtractor {
        fn extract(&self, image: &Path) -> Option<FaceSignature> {
            self.calls.borrow_mut().push(image.to_path_buf());
            self.signatures.get(image).cloned()
        }
    }

    struct Fixture {
        _dir: TempDir,
        selfie: PathBuf,
        document: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let selfie = dir.path().join("selfie.jpg");
        let document = dir.path().join("document.jpg");
        std::fs::write(&selfie, b"selfie").unwrap();
        std::fs::write(&document, b"document").unwrap();
        Fixture {
            _dir: dir,
            selfie,
            document,
        }
    }

    #[test]
    fn status_serialises_in_snake_case() {
        let json = serde_json::to_string(&VerificationStatus::NoFaceId).unwrap();
        assert_eq!(json, "\"no_face_id\"");
        assert_eq!(VerificationStatus::NoFaceId.to_string(), "no_face_id");
    }

    #[test]
    fn missing_document_is_reported_after_selfie_exists() {
        let fx = fixture();
        let missing = fx.selfie.with_file_name("absent.jpg");
        let verifier = Verifier::new(MapExtractor::default());

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &missing, &[]));
        assert_eq!(verdict.status, VerificationStatus::Error);
        assert_eq!(verdict.message, DOCUMENT_MISSING_MESSAGE);
        assert!(verdict.encoding.is_none());
        assert!(verifier.extractor().calls.borrow().is_empty());
    }

    #[test]
    fn selfie_without_face_skips_document_extraction() {
        let fx = fixture();
        let verifier = Verifier::new(MapExtractor::default().with(&fx.document, vec![0.0; 4]));

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::NoFace);
        assert_eq!(verdict.message, NO_FACE_MESSAGE);
        assert!(verdict.encoding.is_none());
        assert_eq!(verifier.extractor().calls.borrow().len(), 1);
    }

    #[test]
    fn document_without_face_reports_no_face_id() {
        let fx = fixture();
        let verifier = Verifier::new(MapExtractor::default().with(&fx.selfie, vec![0.0; 4]));

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::NoFaceId);
        assert!(verdict.encoding.is_none());
    }

    #[test]
    fn document_without_face_wins_over_blocklist_hit() {
        let fx = fixture();
        let verifier = Verifier::new(MapExtractor::default().with(&fx.selfie, vec![0.0; 4]));
        let blocklist = vec![BlocklistEntry::Signature(vec![0.0; 4])];

        let verdict =
            verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &blocklist));
        assert_eq!(verdict.status, VerificationStatus::NoFaceId);
    }

    #[test]
    fn empty_selfie_signature_is_no_face() {
        let fx = fixture();
        let verifier = Verifier::new(
            MapExtractor::default()
                .with(&fx.selfie, vec![])
                .with(&fx.document, vec![]),
        );

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::NoFace);
        assert_eq!(verdict.message, NO_FACE_MESSAGE);
        assert!(verdict.encoding.is_none());
    }

    #[test]
    fn empty_document_signature_is_no_face_id() {
        let fx = fixture();
        let verifier = Verifier::new(
            MapExtractor::default()
                .with(&fx.selfie, vec![0.1, 0.2])
                .with(&fx.document, vec![]),
        );

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::NoFaceId);
        assert_eq!(verdict.message, NO_FACE_ID_MESSAGE);
        assert!(verdict.encoding.is_none());
    }

    #[test]
    fn identity_threshold_boundary_is_verified() {
        let fx = fixture();
        let verifier = Verifier::new(
            MapExtractor::default()
                .with(&fx.selfie, vec![0.0, 0.0])
                .with(&fx.document, vec![0.6, 0.0]),
        );

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::Verified);
        assert_eq!(verdict.message, VERIFIED_MESSAGE);
    }

    #[test]
    fn blocklist_outside_threshold_falls_through_to_identity_check() {
        let fx = fixture();
        let verifier = Verifier::new(
            MapExtractor::default()
                .with(&fx.selfie, vec![0.0, 0.0])
                .with(&fx.document, vec![0.1, 0.0]),
        );
        let blocklist = vec![BlocklistEntry::Signature(vec![0.55, 0.0])];

        let verdict =
            verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &blocklist));
        assert_eq!(verdict.status, VerificationStatus::Verified);
    }

    #[test]
    fn unequal_signature_lengths_are_a_mismatch() {
        let fx = fixture();
        let verifier = Verifier::new(
            MapExtractor::default()
                .with(&fx.selfie, vec![0.0, 0.0])
                .with(&fx.document, vec![0.0, 0.0, 0.0]),
        );

        let verdict = verifier.verify(&VerificationRequest::new(&fx.selfie, &fx.document, &[]));
        assert_eq!(verdict.status, VerificationStatus::Mismatch);
        assert_eq!(verdict.message, MISMATCH_MESSAGE);
    }

    #[test]
    fn verdict_json_uses_null_encoding() {
        let verdict = Verdict::without_encoding(VerificationStatus::Mismatch, MISMATCH_MESSAGE);
        let json: serde_json::Value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["status"], "mismatch");
        assert!(json["encoding"].is_null());
    }
}
