use crate::opcodes::{Opcode, OpcodeClass};
use crate::types::Value;
use std::fmt;
use std::sync::Arc;

/// One node of a generated expression tree.
///
/// The opcode template is shared; the node owns its children and any literal
/// payload the template's randomize hook assigned.
#[derive(Clone)]
pub struct ExprNode {
    pub opcode: Arc<dyn Opcode>,
    pub children: Vec<ExprNode>,
    pub payload: Option<Value>,
}

impl ExprNode {
    pub fn new(opcode: Arc<dyn Opcode>, children: Vec<ExprNode>, payload: Option<Value>) -> Self {
        Self {
            opcode,
            children,
            payload,
        }
    }

    /// A lone terminal has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ExprNode::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ExprNode::node_count).sum::<usize>()
    }

    /// Deterministic canonical rendering, used as the dedup key.
    ///
    /// Binary operators render infix parenthesized, functions render
    /// prefix, terminals render their payload or their alias.
    pub fn to_formula(&self) -> String {
        match self.opcode.class() {
            OpcodeClass::Terminal => match &self.payload {
                Some(value) => value.to_string(),
                None => self.opcode.alias().to_string(),
            },
            OpcodeClass::Operator if self.children.len() == 2 => {
                format!(
                    "({} {} {})",
                    self.children[0].to_formula(),
                    self.opcode.alias(),
                    self.children[1].to_formula()
                )
            }
            _ => {
                let args: Vec<String> = self.children.iter().map(ExprNode::to_formula).collect();
                format!("{}({})", self.opcode.alias(), args.join(", "))
            }
        }
    }

    /// Truncated rendering for log lines
    pub fn to_formula_short(&self, max_len: usize) -> String {
        let mut formula = self.to_formula();
        if formula.len() > max_len {
            formula.truncate(max_len.saturating_sub(3));
            formula.push_str("...");
        }
        formula
    }
}

impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNode")
            .field("opcode", &self.opcode.alias())
            .field("children", &self.children)
            .field("payload", &self.payload)
            .finish()
    }
}

/// A generated program: a root expression plus its acceptance state.
///
/// `species` is the index of the owning species inside its population,
/// assigned only at the locked insertion step.
#[derive(Debug, Clone)]
pub struct Program {
    pub root: ExprNode,
    pub score: f64,
    pub species: Option<usize>,
}

impl Program {
    pub fn new(root: ExprNode) -> Self {
        Self {
            root,
            score: f64::NAN,
            species: None,
        }
    }

    pub fn canonical_text(&self) -> String {
        self.root.to_formula()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::primitives::{Add, FloatConst, Neg};
    use crate::types::Value;

    fn leaf(value: f64) -> ExprNode {
        ExprNode::new(Arc::new(FloatConst), Vec::new(), Some(Value::Float(value)))
    }

    #[test]
    fn operator_renders_infix() {
        let node = ExprNode::new(Arc::new(Add), vec![leaf(1.0), leaf(2.5)], None);
        assert_eq!(node.to_formula(), "(1 + 2.5)");
        assert_eq!(node.depth(), 2);
        assert_eq!(node.node_count(), 3);
    }

    #[test]
    fn function_renders_prefix() {
        let node = ExprNode::new(Arc::new(Neg), vec![leaf(3.0)], None);
        assert_eq!(node.to_formula(), "neg(3)");
    }

    #[test]
    fn short_formula_truncates() {
        let node = ExprNode::new(Arc::new(Add), vec![leaf(1.0), leaf(2.0)], None);
        assert_eq!(node.to_formula_short(6), "(1 ...");
        assert_eq!(node.to_formula_short(80), "(1 + 2)");
    }
}
