//! The fitness evaluation of new individuals. An [`Evaluator`] turns a gene vector into the
//! objective values; [`RotorEvaluator`] does this by analysing a rotor design with the external
//! solver.
pub use cleanup::ScopedFiles;
pub use evaluator::{EvaluationId, Evaluator};
pub use rotor::{
    ObjectiveDirection, OperatingPoint, PenaltyArgs, ResultMetric, ResultObjective,
    RotorEvaluator, RotorEvaluatorArgs,
};

mod cleanup;
mod evaluator;
mod rotor;
