use crate::errors::{MatchingError, MatchingResult};

/// Scales blend weights in place so they sum to one.
///
/// Fails instead of dividing by zero when every weight is zero, or when the sum is not finite.
pub fn normalize_weights(weights: &mut [f32]) -> MatchingResult<()> {
    let sum: f32 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0. {
        return Err(MatchingError::DegenerateBlendWeights(sum));
    }
    for weight in weights.iter_mut() {
        *weight /= sum;
    }
    Ok(())
}
