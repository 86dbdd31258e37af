use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::{GeneSpace, OError};

/// Struct containing the offsprings from the crossover operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverChildren {
    /// The genes of the first generated child.
    pub child1: Vec<f64>,
    /// The genes of the second generated child.
    pub child2: Vec<f64>,
}

/// Trait to define a crossover operator to generate new children by recombining the genetic
/// material of two parents.
pub trait Crossover {
    /// Generate two children from their parents.
    ///
    /// # Arguments
    ///
    /// * `parent1`: The genes of the first parent to use for mating.
    /// * `parent2`: The genes of the second parent to use for mating.
    /// * `space`: The gene bounds.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<CrossoverChildren, OError>`.
    fn generate_offsprings(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        space: &GeneSpace,
        rng: &mut dyn RngCore,
    ) -> Result<CrossoverChildren, OError>;
}

/// Input arguments for [`SimulatedBinaryCrossover`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulatedBinaryCrossoverArgs {
    /// The distribution index for crossover (this is the eta_c in the paper). This directly
    /// control the spread of children. If a large value is selected, the resulting children will
    /// have a higher probability of being close to their parents; a small value generates distant
    /// offsprings.
    pub distribution_index: f64,
    /// The probability that a gene belonging to both parents is used in the crossover. The
    /// paper uses 0.5, meaning that each gene in a solution has a 50% chance of changing its
    /// value.
    pub variable_probability: f64,
}

impl Default for SimulatedBinaryCrossoverArgs {
    /// Default parameters for the Simulated Binary Crossover (SBX) with a distribution index of
    /// 20 and variable probability of `0.5`.
    fn default() -> Self {
        Self {
            distribution_index: 20.0,
            variable_probability: 0.5,
        }
    }
}

/// Simulated Binary Crossover (SBX) operator for bounded real genes.
///
/// Implemented based on:
/// > Kalyanmoy Deb, Karthik Sindhya, and Tatsuya Okabe. 2007. Self-adaptive
/// > simulated binary crossover for real-parameter optimization. In Proceedings of the 9th annual
/// > conference on Genetic and evolutionary computation (GECCO '07). Association for Computing
/// > Machinery, New York, NY, USA, 1187–1194. <https://doi.org/10.1145/1276958.1277190>
///
/// The spread factor accounts for the distance of the parents to the gene bounds, so that the
/// children are always within the bounds.
///
/// The probability that a pair of parents takes part in the crossover is not handled here; the
/// genetic algorithm decides which pairs are mated.
///
/// # Example
///
/// ```
/// use optirotor::core::GeneSpace;
/// use optirotor::operators::{Crossover, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs};
/// use rand_chacha::ChaCha8Rng;
/// use rand::SeedableRng;
///
/// let space = GeneSpace::uniform(2, 0.0, 1000.0).unwrap();
/// let sbx = SimulatedBinaryCrossover::new(SimulatedBinaryCrossoverArgs::default()).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let out = sbx.generate_offsprings(&[0.2, 10.0], &[0.8, 500.0], &space, &mut rng).unwrap();
/// assert!(space.contains(&out.child1) && space.contains(&out.child2));
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedBinaryCrossover {
    /// The distribution index for crossover. This is the eta_c in the paper.
    distribution_index: f64,
    /// The probability that a gene belonging to both parents is used in the crossover.
    variable_probability: f64,
}

impl SimulatedBinaryCrossover {
    /// Initialise the Simulated Binary Crossover (SBX) operator for bounded real genes.
    ///
    /// # Arguments
    ///
    /// * `args.`: The operator input parameters. See [`SimulatedBinaryCrossoverArgs`] for a detail
    /// explanation of the parameters.
    ///
    /// returns: `Result<SBX, OError>`
    pub fn new(args: SimulatedBinaryCrossoverArgs) -> Result<Self, OError> {
        if !args.distribution_index.is_finite() || args.distribution_index < 0.0 {
            return Err(OError::CrossoverOperator(
                "SBX".to_string(),
                format!(
                    "The distribution index {} must be a positive number",
                    args.distribution_index
                ),
            ));
        }
        if !(0.0..=1.0).contains(&args.variable_probability) {
            return Err(OError::CrossoverOperator(
                "SBX".to_string(),
                format!(
                    "The variable probability {} must be a number between 0 and 1",
                    args.variable_probability
                ),
            ));
        }

        Ok(Self {
            distribution_index: args.distribution_index,
            variable_probability: args.variable_probability,
        })
    }

    /// Perform the crossover for two genes from two parents.
    ///
    /// # Arguments
    ///
    /// * `v1`: The gene value from the first parent.
    /// * `v2`: The gene value from the second parent.
    /// * `y_lower`: The gene lower bound.
    /// * `y_upper`: The gene upper bound.
    /// * `rng`: The random number generator reference.
    ///
    /// returns: `Option<(f64, f64)>`. This return two values to assign to the children being
    /// created during the crossover. If the difference between the two parent's value is too small
    /// `None` is returned and no crossover is performed.
    fn crossover_variables(
        &self,
        v1: f64,
        v2: f64,
        y_lower: f64,
        y_upper: f64,
        rng: &mut dyn RngCore,
    ) -> Option<(f64, f64)> {
        // do not perform crossover if the genes have the same value
        if f64::abs(v1 - v2) < 1e-14 {
            return None;
        }

        // get the lowest value between the two parent
        let (y1, y2) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
        let delta_y = y2 - y1;
        let prob = rng.gen_range(0.0..=1.0);

        // first child
        let beta = 1.0 + (2.0 * (y1 - y_lower) / delta_y);
        let alpha = 2.0 - f64::powf(beta, -(self.distribution_index + 1.0));
        let new_v1 = 0.5 * ((y1 + y2) - self.betaq(prob, alpha) * delta_y);

        // second child
        let beta = 1.0 + (2.0 * (y_upper - y2) / delta_y);
        let alpha = 2.0 - f64::powf(beta, -(self.distribution_index + 1.0));
        let new_v2 = 0.5 * ((y1 + y2) + self.betaq(prob, alpha) * delta_y);

        // fall back to the parent's value if the spread factor is not a number
        let new_v1 = if new_v1.is_finite() { new_v1 } else { y1 };
        let new_v2 = if new_v2.is_finite() { new_v2 } else { y2 };

        // make sure the values are within bounds
        let new_v1 = f64::min(f64::max(new_v1, y_lower), y_upper);
        let new_v2 = f64::min(f64::max(new_v2, y_lower), y_upper);

        // randomly swap the values
        if rng.gen_bool(0.5) {
            Some((new_v2, new_v1))
        } else {
            Some((new_v1, new_v2))
        }
    }

    /// Calculate the betaq coefficient.
    ///
    /// # Arguments
    ///
    /// * `prob`: The probability.
    /// * `alpha`: The alpha coefficient.
    ///
    /// returns: `f64`
    fn betaq(&self, prob: f64, alpha: f64) -> f64 {
        if prob <= (1.0 / alpha) {
            f64::powf(prob * alpha, 1.0 / (self.distribution_index + 1.0))
        } else {
            f64::powf(
                1.0 / (2.0 - prob * alpha),
                1.0 / (self.distribution_index + 1.0),
            )
        }
    }
}

impl Crossover for SimulatedBinaryCrossover {
    fn generate_offsprings(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        space: &GeneSpace,
        rng: &mut dyn RngCore,
    ) -> Result<CrossoverChildren, OError> {
        let number_of_genes = space.number_of_genes();
        if parent1.len() != number_of_genes || parent2.len() != number_of_genes {
            return Err(OError::CrossoverOperator(
                "SBX".to_string(),
                format!(
                    "The parents have {} and {} genes, but the gene space has {} genes",
                    parent1.len(),
                    parent2.len(),
                    number_of_genes
                ),
            ));
        }

        let mut child1 = parent1.to_vec();
        let mut child2 = parent2.to_vec();
        for gi in 0..number_of_genes {
            // each gene in a solution has a `self.variable_probability` chance of changing
            // its value
            if rng.gen_range(0.0..=1.0) > self.variable_probability {
                continue;
            }
            let (y_lower, y_upper) = space.bounds(gi);
            if let Some((new_v1, new_v2)) =
                self.crossover_variables(parent1[gi], parent2[gi], y_lower, y_upper, rng)
            {
                child1[gi] = new_v1;
                child2[gi] = new_v2;
            }
        }

        // genes copied from the parents are clamped as well
        for gi in 0..number_of_genes {
            child1[gi] = space.clamp(gi, child1[gi]);
            child2[gi] = space.clamp(gi, child2[gi]);
        }

        Ok(CrossoverChildren { child1, child2 })
    }
}
