pub mod builder;
pub mod generator;
pub mod population;
pub mod selector;
pub mod tree;

pub use builder::{GrowthStrategy, TreeBuilder};
pub use generator::TreeGenerator;
pub use population::{FillState, Population, Species};
pub use selector::generate_random_opcode;
pub use tree::{ExprNode, Program};
