use crate::types::{TypeSet, Value};
use rand::RngCore;

/// Opcode classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeClass {
    /// Multi-child opcode rendered infix; children are homogenized to one type
    Operator,
    /// Prefix-rendered opcode; each argument position types independently
    Function,
    /// Leaf opcode, zero children
    Terminal,
}

/// Inclusive bounds for randomized literal payloads
#[derive(Debug, Clone, Copy)]
pub struct LiteralBounds {
    pub min: f64,
    pub max: f64,
}

/// A registered operation template.
///
/// Templates are stateless descriptors shared behind `Arc`; per-node literal
/// state lives in the node's payload, assigned by `randomize` after
/// construction.
pub trait Opcode: Send + Sync {
    /// Name used in canonical text
    fn alias(&self) -> &'static str;

    /// Number of children
    fn arity(&self) -> usize;

    fn class(&self) -> OpcodeClass;

    /// Types this opcode can produce
    fn output_types(&self) -> TypeSet;

    /// Allowed types for the argument at `position`, given the types
    /// requested of this node
    fn arg_types(&self, requested: &TypeSet, position: usize) -> TypeSet;

    /// Post-construction hook; may assign a literal payload
    fn randomize(&self, _rng: &mut dyn RngCore, _bounds: &LiteralBounds) -> Option<Value> {
        None
    }
}
