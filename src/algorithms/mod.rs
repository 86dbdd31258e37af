pub use algorithm::{Algorithm, Elapsed, RunResults};
pub use nsga3::{ArtifactExport, InterruptHandle, NSGA3Arg, Nsga3Selector, NSGA3};
pub use statistics::{GenerationStatistics, Logbook};
pub use stopping_condition::{
    MaxDurationValue, MaxFunctionEvaluationValue, MaxGenerationValue, StoppingCondition,
    StoppingConditionType,
};

mod algorithm;
mod nsga3;
mod statistics;
mod stopping_condition;
