use super::traits::ConfigSection;
use crate::error::TreegenError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Ceiling on generated tree depth; a lone terminal counts as depth 1
    pub max_depth: usize,
    /// Inclusive lower bound for randomized literals
    pub min_const: f64,
    /// Inclusive upper bound for randomized literals
    pub max_const: f64,
    /// Worker threads for population fill; 1 forces sequential generation
    pub thread_count: usize,
    /// Per-individual attempt budget before a fill aborts
    pub max_generation_errors: usize,
    pub population_size: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_depth: 12,
            min_const: -10.0,
            max_const: 10.0,
            thread_count: 1,
            max_generation_errors: 500,
            population_size: 500,
        }
    }
}

impl ConfigSection for GenerationConfig {
    fn section_name() -> &'static str {
        "generation"
    }

    fn validate(&self) -> Result<(), TreegenError> {
        if self.max_depth < 1 {
            return Err(TreegenError::Configuration(
                "Max depth must be at least 1".to_string(),
            ));
        }
        if self.min_const > self.max_const {
            return Err(TreegenError::Configuration(format!(
                "Literal bounds are inverted: [{}, {}]",
                self.min_const, self.max_const
            )));
        }
        if self.thread_count < 1 {
            return Err(TreegenError::Configuration(
                "Thread count must be at least 1".to_string(),
            ));
        }
        if self.max_generation_errors < 1 {
            return Err(TreegenError::Configuration(
                "Generation attempt budget must be at least 1".to_string(),
            ));
        }
        if self.population_size < 1 {
            return Err(TreegenError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
