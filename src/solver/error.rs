use std::time::Duration;

use thiserror::Error;

/// Errors raised when running the external rotor solver or reading its results. The evaluation
/// pipeline turns any of these into a penalised objective.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Cannot start the solver '{0}': {1}")]
    Spawn(String, String),
    #[error("An I/O error occurred while communicating with the solver: {0}")]
    Io(String),
    #[error("The solver did not complete within {0:?} and was terminated")]
    Timeout(Duration),
    #[error("The solver result file '{0}' was not produced")]
    MissingOutput(String),
    #[error("The solver result file '{0}' is malformed: {1}")]
    MalformedOutput(String, String),
}
