use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type an expression node can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    Float,
}

/// Ordered set of value types.
///
/// Required types flow top-down during construction: the root starts from the
/// grammar's declared result type, each child gets the set computed from its
/// parent's argument rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet(Vec<ValueType>);

impl TypeSet {
    pub fn new(types: &[ValueType]) -> Self {
        let mut set = Self::default();
        for t in types {
            set.insert(*t);
        }
        set
    }

    pub fn single(t: ValueType) -> Self {
        Self(vec![t])
    }

    pub fn numeric() -> Self {
        Self(vec![ValueType::Int, ValueType::Float])
    }

    pub fn insert(&mut self, t: ValueType) {
        if !self.0.contains(&t) {
            self.0.push(t);
        }
    }

    pub fn contains(&self, t: ValueType) -> bool {
        self.0.contains(&t)
    }

    pub fn intersects(&self, other: &TypeSet) -> bool {
        self.0.iter().any(|t| other.contains(*t))
    }

    pub fn intersect(&self, other: &TypeSet) -> TypeSet {
        TypeSet(self.0.iter().copied().filter(|t| other.contains(*t)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.0.iter().copied()
    }

    /// Draw one concrete type uniformly from the set
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ValueType> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0[rng.gen_range(0..self.0.len())])
        }
    }
}

/// Literal payload assigned by an opcode's randomize hook
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}
