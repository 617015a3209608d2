use crate::engine::tree::Program;
use anyhow::Result;

/// Scoring collaborator.
///
/// A returned error is recovered by the attempt loop: the candidate gets a
/// NaN score, is rejected, and the attempt retries. Errors never surface to
/// the fill caller.
pub trait Scorer: Send + Sync {
    fn calculate_score(&self, program: &Program) -> Result<f64>;

    /// When true, population fill runs strictly sequentially regardless of
    /// the configured thread count
    fn requires_single_thread(&self) -> bool {
        false
    }
}
