//! Randomized, type-constrained program-tree generation for tree-based
//! genetic programming.
//!
//! Given a grammar of typed opcodes, the engine synthesizes depth- and
//! type-valid expression trees, filters them through a scoring
//! collaborator, deduplicates by canonical text, and fills whole
//! populations sequentially or across worker threads.

pub mod config;
pub mod engine;
pub mod error;
pub mod opcodes;
pub mod random;
pub mod scoring;
pub mod types;

pub use config::GenerationConfig;
pub use engine::{ExprNode, GrowthStrategy, Population, Program, Species, TreeGenerator};
pub use error::{Result, TreegenError};
pub use opcodes::{LiteralBounds, Opcode, OpcodeClass, OpcodeRegistry};
pub use random::{EntropyFactory, RandomFactory, SeedSequenceFactory};
pub use scoring::Scorer;
pub use types::{TypeSet, Value, ValueType};
