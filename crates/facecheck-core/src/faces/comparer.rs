/// Maximum distance at which a selfie and a document are the same person.
pub const IDENTITY_THRESHOLD: f64 = 0.6;

/// Euclidean distance between two embeddings.
///
/// Vectors of different length are not comparable and yield `f64::INFINITY`,
/// which never satisfies any finite threshold.
pub fn euclidean_distance(lhs: &[f64], rhs: &[f64]) -> f64 {
    if lhs.len() != rhs.len() {
        return f64::INFINITY;
    }

    lhs.iter()
        .zip(rhs.iter())
        .map(|(l, r)| {
            let diff = l - r;
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}

pub fn is_same_identity(lhs: &[f64], rhs: &[f64]) -> bool {
    euclidean_distance(lhs, rhs) <= IDENTITY_THRESHOLD
}
