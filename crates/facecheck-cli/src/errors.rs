pub use facecheck_core::errors::*;
