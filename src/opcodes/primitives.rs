use super::traits::{LiteralBounds, Opcode, OpcodeClass};
use crate::types::{TypeSet, Value, ValueType};
use rand::{Rng, RngCore};

// --- Numeric operators ---
//
// Output whichever numeric types the parent asked for; both argument
// positions report the same allowed set, so homogenization draws one
// concrete type and forces it on both children.

pub struct Add;

impl Opcode for Add {
    fn alias(&self) -> &'static str { "+" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::numeric() }
    fn arg_types(&self, requested: &TypeSet, _position: usize) -> TypeSet {
        requested.intersect(&TypeSet::numeric())
    }
}

pub struct Sub;

impl Opcode for Sub {
    fn alias(&self) -> &'static str { "-" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::numeric() }
    fn arg_types(&self, requested: &TypeSet, _position: usize) -> TypeSet {
        requested.intersect(&TypeSet::numeric())
    }
}

pub struct Mul;

impl Opcode for Mul {
    fn alias(&self) -> &'static str { "*" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::numeric() }
    fn arg_types(&self, requested: &TypeSet, _position: usize) -> TypeSet {
        requested.intersect(&TypeSet::numeric())
    }
}

// --- Comparisons ---
//
// Produce Bool from any numeric pair; argument types ignore the requested
// output set.

pub struct Gt;

impl Opcode for Gt {
    fn alias(&self) -> &'static str { ">" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::numeric()
    }
}

pub struct Lt;

impl Opcode for Lt {
    fn alias(&self) -> &'static str { "<" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::numeric()
    }
}

// --- Boolean operators ---

pub struct And;

impl Opcode for And {
    fn alias(&self) -> &'static str { "and" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::single(ValueType::Bool)
    }
}

pub struct Or;

impl Opcode for Or {
    fn alias(&self) -> &'static str { "or" }
    fn arity(&self) -> usize { 2 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Operator }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::single(ValueType::Bool)
    }
}

// --- Functions ---

pub struct Neg;

impl Opcode for Neg {
    fn alias(&self) -> &'static str { "neg" }
    fn arity(&self) -> usize { 1 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Function }
    fn output_types(&self) -> TypeSet { TypeSet::numeric() }
    fn arg_types(&self, requested: &TypeSet, _position: usize) -> TypeSet {
        requested.intersect(&TypeSet::numeric())
    }
}

pub struct Not;

impl Opcode for Not {
    fn alias(&self) -> &'static str { "not" }
    fn arity(&self) -> usize { 1 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Function }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::single(ValueType::Bool)
    }
}

/// Conditional select: args are (condition, then-value, else-value)
pub struct IfElse;

impl Opcode for IfElse {
    fn alias(&self) -> &'static str { "if" }
    fn arity(&self) -> usize { 3 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Function }
    fn output_types(&self) -> TypeSet { TypeSet::numeric() }
    fn arg_types(&self, requested: &TypeSet, position: usize) -> TypeSet {
        if position == 0 {
            TypeSet::single(ValueType::Bool)
        } else {
            requested.intersect(&TypeSet::numeric())
        }
    }
}

// --- Terminals ---

pub struct FloatConst;

impl Opcode for FloatConst {
    fn alias(&self) -> &'static str { "const" }
    fn arity(&self) -> usize { 0 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Terminal }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Float) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::default()
    }
    fn randomize(&self, rng: &mut dyn RngCore, bounds: &LiteralBounds) -> Option<Value> {
        Some(Value::Float(rng.gen_range(bounds.min..=bounds.max)))
    }
}

pub struct IntConst;

impl Opcode for IntConst {
    fn alias(&self) -> &'static str { "iconst" }
    fn arity(&self) -> usize { 0 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Terminal }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Int) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::default()
    }
    fn randomize(&self, rng: &mut dyn RngCore, bounds: &LiteralBounds) -> Option<Value> {
        let lo = bounds.min.ceil() as i64;
        let hi = bounds.max.floor() as i64;
        // Bounds narrower than one integer leave nothing to draw
        if lo > hi {
            None
        } else {
            Some(Value::Integer(rng.gen_range(lo..=hi)))
        }
    }
}

pub struct BoolConst;

impl Opcode for BoolConst {
    fn alias(&self) -> &'static str { "flag" }
    fn arity(&self) -> usize { 0 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Terminal }
    fn output_types(&self) -> TypeSet { TypeSet::single(ValueType::Bool) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::default()
    }
    fn randomize(&self, rng: &mut dyn RngCore, _bounds: &LiteralBounds) -> Option<Value> {
        Some(Value::Bool(rng.gen_bool(0.5)))
    }
}

/// Named input variable terminal
pub struct Input {
    name: &'static str,
    value_type: ValueType,
}

impl Input {
    pub fn new(name: &'static str, value_type: ValueType) -> Self {
        Self { name, value_type }
    }
}

impl Opcode for Input {
    fn alias(&self) -> &'static str { self.name }
    fn arity(&self) -> usize { 0 }
    fn class(&self) -> OpcodeClass { OpcodeClass::Terminal }
    fn output_types(&self) -> TypeSet { TypeSet::single(self.value_type) }
    fn arg_types(&self, _requested: &TypeSet, _position: usize) -> TypeSet {
        TypeSet::default()
    }
}
