use super::selector::generate_random_opcode;
use super::tree::ExprNode;
use crate::error::{Result, TreegenError};
use crate::opcodes::{LiteralBounds, OpcodeClass, OpcodeRegistry};
use crate::types::TypeSet;
use rand::Rng;
use std::sync::Arc;

/// Generation strategy for one tree.
///
/// `Full` forces non-terminal expansion at every level until the depth limit,
/// yielding maximally deep, regular trees. `Grow` admits terminals at every
/// level, yielding irregular, often shallower trees. Both force a terminal
/// once the depth budget hits zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStrategy {
    Full,
    Grow,
}

impl GrowthStrategy {
    /// Depth ceiling for one tree; both strategies currently use the
    /// configured maximum, the hook exists for ramped variants
    pub fn determine_max_depth<R: Rng>(&self, _rng: &mut R, configured: usize) -> usize {
        configured
    }

    fn include_terminal(&self) -> bool {
        matches!(self, GrowthStrategy::Grow)
    }
}

impl Default for GrowthStrategy {
    fn default() -> Self {
        GrowthStrategy::Grow
    }
}

/// Recursive, depth- and type-constrained tree construction
pub struct TreeBuilder {
    registry: Arc<OpcodeRegistry>,
    strategy: GrowthStrategy,
    max_depth: usize,
    bounds: LiteralBounds,
}

impl TreeBuilder {
    pub fn new(
        registry: Arc<OpcodeRegistry>,
        strategy: GrowthStrategy,
        max_depth: usize,
        bounds: LiteralBounds,
    ) -> Self {
        Self {
            registry,
            strategy,
            max_depth,
            bounds,
        }
    }

    /// Build one tree rooted at the grammar's declared result type
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<ExprNode> {
        let depth = self.strategy.determine_max_depth(rng, self.max_depth);
        // A depth ceiling of 0 or 1 both yield a bare terminal
        self.create_node(rng, depth.saturating_sub(1), &self.registry.result_types())
    }

    /// Strategy dispatch for one node; depth budget zero always forces a
    /// terminal
    pub fn create_node<R: Rng>(
        &self,
        rng: &mut R,
        depth_remaining: usize,
        required: &TypeSet,
    ) -> Result<ExprNode> {
        if depth_remaining == 0 {
            return self.create_terminal_node(rng, required);
        }
        self.create_random_node(
            rng,
            depth_remaining,
            required,
            self.strategy.include_terminal(),
            true,
        )
    }

    pub fn create_random_node<R: Rng>(
        &self,
        rng: &mut R,
        depth_remaining: usize,
        required: &TypeSet,
        include_terminal: bool,
        include_function: bool,
    ) -> Result<ExprNode> {
        // Exhausted depth budget forces terminal-only creation no matter
        // what the caller's include flags say
        if depth_remaining == 0 {
            return self.create_terminal_node(rng, required);
        }
        let candidates = self
            .registry
            .find_opcodes(required, include_terminal, include_function);
        let opcode = generate_random_opcode(rng, &candidates)?.ok_or_else(|| {
            TreegenError::Compile(format!("no opcode matches required types {:?}", required))
        })?;

        let arity = opcode.arity();
        let mut children = Vec::with_capacity(arity);

        if opcode.class() == OpcodeClass::Operator && arity >= 2 {
            // Homogenization: one concrete type from the first argument
            // position's allowed union, forced on every child
            let union = opcode.arg_types(required, 0);
            let concrete = union.choose(rng).ok_or_else(|| {
                TreegenError::Compile(format!(
                    "operator '{}' admits no argument types for {:?}",
                    opcode.alias(),
                    required
                ))
            })?;
            let child_required = TypeSet::single(concrete);
            for _ in 0..arity {
                children.push(self.create_node(rng, depth_remaining - 1, &child_required)?);
            }
        } else {
            for position in 0..arity {
                let child_required = opcode.arg_types(required, position);
                children.push(self.create_node(rng, depth_remaining - 1, &child_required)?);
            }
        }

        let payload = opcode.randomize(rng, &self.bounds);
        Ok(ExprNode::new(opcode, children, payload))
    }

    pub fn create_terminal_node<R: Rng>(
        &self,
        rng: &mut R,
        required: &TypeSet,
    ) -> Result<ExprNode> {
        let candidates = self.registry.find_opcodes(required, true, false);
        let opcode = generate_random_opcode(rng, &candidates)?.ok_or_else(|| {
            TreegenError::Compile(format!(
                "no terminal opcode matches required types {:?}",
                required
            ))
        })?;
        let payload = opcode.randomize(rng, &self.bounds);
        Ok(ExprNode::new(opcode, Vec::new(), payload))
    }
}
