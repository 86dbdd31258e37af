use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{GeneSpace, OError};

/// The trait to implement a mutation operator to modify the genetic material of an individual.
pub trait Mutation {
    /// Mutate the genes of an offspring.
    ///
    /// # Arguments
    ///
    /// * `genes`: The genes to mutate.
    /// * `space`: The gene bounds.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<Vec<f64>, OError>`. The mutated genes.
    fn mutate_offspring(
        &self,
        genes: &[f64],
        space: &GeneSpace,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, OError>;
}

/// Input arguments for [`PolynomialMutation`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PolynomialMutationArgs {
    /// A user-defined parameter to control the mutation. This is eta_m in the paper, and it is
    /// suggested its value to be in the [20, 100] range.
    pub index_parameter: f64,
    /// The probability of mutating a gene.
    pub variable_probability: f64,
}

impl PolynomialMutationArgs {
    /// Initialise the Polynomial mutation (PM) operator with the default parameters. With a
    /// distribution index or index parameter of `20` and variable probability equal `1` divided by
    /// the number of genes (i.e. on average one gene is mutated).
    ///
    /// # Arguments
    ///
    /// * `space`: The gene space.
    ///
    /// returns: `Self`
    pub fn default(space: &GeneSpace) -> Self {
        Self {
            index_parameter: 20.0,
            variable_probability: 1.0 / space.number_of_genes() as f64,
        }
    }
}

/// The Polynomial mutation (PM) operator for bounded real genes.
///
/// Adapted from [Deb & Deb (2014)](https://dl.acm.org/doi/10.1504/IJAISC.2014.059280), full
/// text available at <https://www.egr.msu.edu/~kdeb/papers/k2012016.pdf>. The perturbation is
/// scaled by the distance of the gene to the nearer bound and the result is always within bounds.
///
/// # Example
///
/// ```
/// use optirotor::core::GeneSpace;
/// use optirotor::operators::{Mutation, PolynomialMutation, PolynomialMutationArgs};
/// use rand_chacha::ChaCha8Rng;
/// use rand::SeedableRng;
///
/// let space = GeneSpace::uniform(3, 0.0, 1.0).unwrap();
/// let pm = PolynomialMutation::new(PolynomialMutationArgs::default(&space)).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let out = pm.mutate_offspring(&[0.2, 0.5, 1.0], &space, &mut rng).unwrap();
/// assert!(space.contains(&out));
/// ```
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    /// The user-defined parameter to control the mutation.
    index_parameter: f64,
    /// The probability of mutating a gene.
    variable_probability: f64,
}

impl PolynomialMutation {
    /// Initialise the Polynomial mutation (PM) operator. This returns an error if the probability
    /// is outside the [0, 1] range or the index parameter is negative.
    ///
    /// # Arguments
    ///
    /// * `args`: The operator parameters.
    ///
    /// returns: `Result<PolynomialMutation, OError>`
    pub fn new(args: PolynomialMutationArgs) -> Result<Self, OError> {
        if !(0.0..=1.0).contains(&args.variable_probability) {
            return Err(OError::MutationOperator(
                "PolynomialMutation".to_string(),
                format!(
                    "The variable probability {} must be a number between 0 and 1",
                    args.variable_probability
                ),
            ));
        }
        if !args.index_parameter.is_finite() || args.index_parameter < 0.0 {
            return Err(OError::MutationOperator(
                "PolynomialMutation".to_string(),
                format!(
                    "The index parameter {} must be a positive number",
                    args.index_parameter
                ),
            ));
        }
        Ok(Self {
            index_parameter: args.index_parameter,
            variable_probability: args.variable_probability,
        })
    }

    /// Perform the mutation of a gene for an offspring.
    ///
    /// # Arguments
    ///
    /// * `y`: The gene value to mutate.
    /// * `y_lower`: The gene lower bound.
    /// * `y_upper`: The gene upper bound.
    /// * `rng`: The random number generator reference.
    ///
    /// returns: `f64`
    fn mutate_variable(&self, y: f64, y_lower: f64, y_upper: f64, rng: &mut dyn RngCore) -> f64 {
        let y = f64::min(f64::max(y, y_lower), y_upper);
        let delta_y = y_upper - y_lower;
        if delta_y <= 0.0 {
            return y_lower;
        }
        let prob = rng.gen_range(0.0..1.0);

        // this is delta_l or delta_r
        let delta = if prob < 0.5 {
            let bl = (y - y_lower) / delta_y;
            let b =
                2.0 * prob + (1.0 - 2.0 * prob) * f64::powf(1.0 - bl, self.index_parameter + 1.0);
            f64::powf(b, 1.0 / (self.index_parameter + 1.0)) - 1.0
        } else {
            let bu = (y_upper - y) / delta_y;
            let b = 2.0 * (1.0 - prob)
                + 2.0 * (prob - 0.5) * f64::powf(1.0 - bu, self.index_parameter + 1.0);
            1.0 - f64::powf(b, 1.0 / (self.index_parameter + 1.0))
        };

        let new_y = y + delta * delta_y;
        if !new_y.is_finite() {
            return y;
        }
        f64::min(f64::max(new_y, y_lower), y_upper)
    }
}

impl Mutation for PolynomialMutation {
    fn mutate_offspring(
        &self,
        genes: &[f64],
        space: &GeneSpace,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>, OError> {
        if genes.len() != space.number_of_genes() {
            return Err(OError::MutationOperator(
                "PolynomialMutation".to_string(),
                format!(
                    "The offspring has {} genes, but the gene space has {} genes",
                    genes.len(),
                    space.number_of_genes()
                ),
            ));
        }

        Ok(genes
            .iter()
            .enumerate()
            .map(|(gi, y)| {
                // each gene has a `self.variable_probability` chance of being mutated
                if rng.gen_range(0.0..=1.0) > self.variable_probability {
                    space.clamp(gi, *y)
                } else {
                    let (y_lower, y_upper) = space.bounds(gi);
                    self.mutate_variable(*y, y_lower, y_upper, rng)
                }
            })
            .collect())
    }
}
