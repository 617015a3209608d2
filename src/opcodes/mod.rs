pub mod primitives;
pub mod registry;
pub mod traits;

pub use registry::OpcodeRegistry;
pub use traits::{LiteralBounds, Opcode, OpcodeClass};
