use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum OError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("The gene space is not valid: {0}")]
    GeneSpace(String),
    #[error("The min value ({0}) must be smaller than or equal to the max value ({1}).")]
    TooLargeLowerBound(String, String),
    #[error("The individual has not been evaluated yet and has no valid fitness")]
    InvalidFitness,
    #[error("An error occurred in the crossover operator '{0}': {1}")]
    CrossoverOperator(String, String),
    #[error("An error occurred in the mutation operator '{0}': {1}")]
    MutationOperator(String, String),
    #[error("An error occurred in the survival operator '{0}': {1}")]
    SurvivalOperator(String, String),
    #[error("An error occurred when generating the reference points: {0}")]
    ReferencePoints(String),
    #[error("An error occurred when evaluating a solution: {0}")]
    Evaluation(String),
    #[error("An error occurred when writing the rotor model: {0}")]
    Model(String),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when running {0}: {1}")]
    AlgorithmRun(String, String),
    #[error("An error occurred when exporting the algorithm data: {0}")]
    AlgorithmExport(String),
    #[error("Cannot read the configuration file '{0}': {1}")]
    Config(String, String),
    #[error("NaN detected when adding {0} '{1}'. This may be an error in the user-defined evaluation function")]
    NaN(String, String),
}
