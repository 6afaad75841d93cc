//! Error taxonomy for the executor.
//!
//! Fatal errors (`ModelContractViolation`, `DuplicateName`) abort `init_sim`
//! or model promotion, leaving the executor in `TERMINATED`. The rest are
//! reported back through the host-facing call that triggered them without
//! disturbing loop state.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("model '{0}' returned a negative time_advance, or is otherwise malformed")]
    ModelContractViolation(String),

    #[error("unknown executor input port '{0}'")]
    UnknownPort(String),

    #[error("duplicate model name '{0}' during promotion")]
    DuplicateName(String),

    #[error("model '{0}' not found in the active set")]
    ModelNotFound(String),
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
