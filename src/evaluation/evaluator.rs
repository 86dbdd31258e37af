use std::fmt::{Debug, Display, Formatter};
use std::path::Path;

use crate::core::OError;

/// The identifier of one evaluation in a batch. No two evaluations of the same batch share an
/// identifier, so it can name the temporary files of evaluations running at the same time. The
/// `index` is the position among the individuals evaluated in the generation; it does not follow
/// an individual across generations, and other runs use the same identifiers. Evaluators writing
/// files to a shared directory must add their own run token (see
/// [`crate::evaluation::RotorEvaluator`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvaluationId {
    /// The generation the individual is evaluated in.
    pub generation: usize,
    /// The position of the individual in the batch being evaluated.
    pub index: usize,
}

impl EvaluationId {
    /// Create a new identifier.
    ///
    /// # Arguments
    ///
    /// * `generation`: The generation number.
    /// * `index`: The individual position in the evaluated batch.
    ///
    /// returns: `EvaluationId`
    pub fn new(generation: usize, index: usize) -> Self {
        Self { generation, index }
    }

    /// The stem to use in the temporary file names of this evaluation.
    ///
    /// returns: `String`
    pub fn file_stem(&self) -> String {
        format!("g{}_i{}", self.generation, self.index)
    }
}

impl Display for EvaluationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "generation #{}, individual #{}", self.generation, self.index)
    }
}

/// The trait to use to evaluate the objectives of a new individual. All the objectives are
/// minimised; an implementation maximising a quantity must return its negated value.
///
/// The evaluator is called concurrently from the worker threads of the algorithm and must not
/// rely on shared mutable state.
pub trait Evaluator: Sync + Send + Debug {
    /// The number of objective values returned by [`Evaluator::evaluate`].
    ///
    /// returns: `usize`
    fn number_of_objectives(&self) -> usize;

    /// The number of genes the evaluator expects, if fixed. The algorithm checks this against
    /// the gene space when it is created.
    ///
    /// returns: `Option<usize>`
    fn expected_number_of_genes(&self) -> Option<usize> {
        None
    }

    /// Evaluate the objectives of a gene vector. The function must return
    /// [`Evaluator::number_of_objectives`] values. A failed simulation should be turned into a
    /// penalised objective vector; an error stops the algorithm.
    ///
    /// # Arguments
    ///
    /// * `genes`: The genes to evaluate.
    /// * `id`: The unique identifier of this evaluation.
    ///
    /// returns: `Result<Vec<f64>, OError>`
    ///
    /// ## Example
    /// ```
    /// use optirotor::core::OError;
    /// use optirotor::evaluation::{EvaluationId, Evaluator};
    ///
    /// // minimise x^2 and (x-2)^2
    /// #[derive(Debug)]
    /// struct SCHEvaluator;
    /// impl Evaluator for SCHEvaluator {
    ///     fn number_of_objectives(&self) -> usize {
    ///         2
    ///     }
    ///     fn evaluate(&self, genes: &[f64], _id: &EvaluationId) -> Result<Vec<f64>, OError> {
    ///         let x = genes[0];
    ///         Ok(vec![x.powi(2), (x - 2.0).powi(2)])
    ///     }
    /// }
    ///
    /// let values = SCHEvaluator.evaluate(&[1.0], &EvaluationId::new(0, 0)).unwrap();
    /// assert_eq!(values, vec![1.0, 1.0]);
    /// ```
    fn evaluate(&self, genes: &[f64], id: &EvaluationId) -> Result<Vec<f64>, OError>;

    /// Write a file describing the design encoded by `genes`. This is used by the algorithm to
    /// export the best designs after each generation. By default, nothing is written.
    ///
    /// # Arguments
    ///
    /// * `genes`: The genes of the design to export.
    /// * `name`: The design name.
    /// * `file`: The destination file.
    ///
    /// returns: `Result<(), OError>`
    fn export_design(&self, _genes: &[f64], _name: &str, _file: &Path) -> Result<(), OError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::evaluation::EvaluationId;

    #[test]
    fn test_file_stem() {
        let id = EvaluationId::new(3, 12);
        assert_eq!(id.file_stem(), "g3_i12");
        assert_ne!(id.file_stem(), EvaluationId::new(31, 2).file_stem());
        assert_eq!(id.to_string(), "generation #3, individual #12");
    }
}
