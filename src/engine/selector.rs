use crate::error::{Result, TreegenError};
use crate::opcodes::Opcode;
use rand::Rng;
use std::sync::Arc;

/// Defensive cap on uniform draws before selection is declared stuck
pub const OPCODE_RETRY_BUDGET: usize = 10_000;

/// Uniform draw over a candidate list.
///
/// An empty list yields `Ok(None)` — a signal, not a fault; callers treat it
/// as a fatal construction failure. Exhausting the retry budget without a
/// valid draw should not happen in correct usage but is detected anyway.
pub fn generate_random_opcode<R: Rng>(
    rng: &mut R,
    candidates: &[Arc<dyn Opcode>],
) -> Result<Option<Arc<dyn Opcode>>> {
    if candidates.is_empty() {
        return Ok(None);
    }

    for _ in 0..OPCODE_RETRY_BUDGET {
        let idx = rng.gen_range(0..candidates.len());
        if let Some(opcode) = candidates.get(idx) {
            return Ok(Some(Arc::clone(opcode)));
        }
    }

    Err(TreegenError::Compile("opcode selection exhausted".to_string()))
}
