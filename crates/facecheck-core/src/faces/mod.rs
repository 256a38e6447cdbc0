pub mod blocklist;
pub mod comparer;
pub mod extractor;
pub mod signature;

pub use blocklist::{
    check_blocklist, parse_blocklist, BlocklistEntry, BlocklistMatch, BLOCKLIST_THRESHOLD,
};

pub use comparer::{euclidean_distance, is_same_identity, IDENTITY_THRESHOLD};

#[cfg(feature = "dlib")]
pub use extractor::{dlib_extractor, DlibBackend};
pub use extractor::{
    BoundingBox, EnvModelPathResolver, FaceEmbeddingBackend, FaceEmbeddingRecord,
    FaceModelConfig, FaceModelPaths, ImageSignatureExtractor, ModelPathResolver,
    SignatureExtractor,
};

pub use signature::{load_signature, persist_signature, FaceSignature, SIGNATURE_LEN};
