use super::primitives::{
    Add, And, BoolConst, FloatConst, Gt, IfElse, Input, IntConst, Lt, Mul, Neg, Not, Or, Sub,
};
use super::traits::{Opcode, OpcodeClass};
use crate::types::{TypeSet, ValueType};
use std::sync::Arc;

/// Grammar of registered opcodes plus the program's declared result type.
///
/// Lookups return Arc clones filtered by output-type intersection and by the
/// caller's terminal/function include flags.
pub struct OpcodeRegistry {
    opcodes: Vec<Arc<dyn Opcode>>,
    result_type: ValueType,
}

impl OpcodeRegistry {
    /// Empty registry; callers register opcodes before handing it to a
    /// generator
    pub fn new(result_type: ValueType) -> Self {
        Self {
            opcodes: Vec::new(),
            result_type,
        }
    }

    /// Registry pre-populated with the built-in arithmetic/boolean grammar
    pub fn standard(result_type: ValueType) -> Self {
        let mut registry = Self::new(result_type);
        let opcodes: Vec<Arc<dyn Opcode>> = vec![
            Arc::new(Add),
            Arc::new(Sub),
            Arc::new(Mul),
            Arc::new(Gt),
            Arc::new(Lt),
            Arc::new(And),
            Arc::new(Or),
            Arc::new(Neg),
            Arc::new(Not),
            Arc::new(IfElse),
            Arc::new(FloatConst),
            Arc::new(IntConst),
            Arc::new(BoolConst),
            Arc::new(Input::new("x", ValueType::Float)),
        ];
        for opcode in opcodes {
            registry.register(opcode);
        }
        registry
    }

    pub fn register(&mut self, opcode: Arc<dyn Opcode>) {
        self.opcodes.push(opcode);
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn result_type(&self) -> ValueType {
        self.result_type
    }

    /// Required-type set for a program root
    pub fn result_types(&self) -> TypeSet {
        TypeSet::single(self.result_type)
    }

    /// Candidates whose output types intersect `required`, filtered by class:
    /// terminals when `include_terminal`, operators and functions when
    /// `include_function`
    pub fn find_opcodes(
        &self,
        required: &TypeSet,
        include_terminal: bool,
        include_function: bool,
    ) -> Vec<Arc<dyn Opcode>> {
        self.opcodes
            .iter()
            .filter(|op| match op.class() {
                OpcodeClass::Terminal => include_terminal,
                OpcodeClass::Operator | OpcodeClass::Function => include_function,
            })
            .filter(|op| op.output_types().intersects(required))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_respects_class_flags() {
        let registry = OpcodeRegistry::standard(ValueType::Float);
        let required = TypeSet::single(ValueType::Float);

        let terminals = registry.find_opcodes(&required, true, false);
        assert!(!terminals.is_empty());
        assert!(terminals
            .iter()
            .all(|op| op.class() == OpcodeClass::Terminal));

        let functions = registry.find_opcodes(&required, false, true);
        assert!(!functions.is_empty());
        assert!(functions
            .iter()
            .all(|op| op.class() != OpcodeClass::Terminal));
    }

    #[test]
    fn find_respects_required_types() {
        let registry = OpcodeRegistry::standard(ValueType::Float);
        let bool_only = TypeSet::single(ValueType::Bool);
        for op in registry.find_opcodes(&bool_only, true, true) {
            assert!(op.output_types().contains(ValueType::Bool), "{}", op.alias());
        }
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = OpcodeRegistry::new(ValueType::Float);
        assert!(registry.is_empty());
        assert!(registry
            .find_opcodes(&TypeSet::single(ValueType::Float), true, true)
            .is_empty());
    }
}
