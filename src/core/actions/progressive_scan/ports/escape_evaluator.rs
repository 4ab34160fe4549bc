use crate::core::data::complex::Complex;
use crate::core::data::escape_result::EscapeResult;

/// Iterates one sample point. Called once per painted block, so it must not
/// allocate.
pub trait EscapeEvaluator: Send + Sync {
    fn evaluate(&self, c: Complex) -> EscapeResult;
}
