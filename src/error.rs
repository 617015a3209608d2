use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreegenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Compile error: {0}")]
    Compile(String),

    #[error("Generation budget exhausted after {attempts} attempts")]
    BudgetExhausted { attempts: usize },
}

pub type Result<T> = std::result::Result<T, TreegenError>;
