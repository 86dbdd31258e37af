use std::fmt::{Display, Formatter};
use std::ops::RangeBounds;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::core::{GeneSpace, OError};

/// The fitness of an individual. This is [`Fitness::Invalid`] until the individual is evaluated.
/// All the objectives are minimised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Fitness {
    /// The individual has not been evaluated.
    #[default]
    Invalid,
    /// The objective values.
    Valid(Vec<f64>),
}

impl Fitness {
    /// Whether the fitness has been assigned.
    ///
    /// returns: `bool`
    pub fn is_valid(&self) -> bool {
        matches!(self, Fitness::Valid(_))
    }
}

/// An individual in the population containing a gene vector and its fitness.
///
/// The gene vector is never edited once owned by an individual; the variation operators create
/// new vectors and new individuals with an invalid fitness.
///
/// # Example
/// ```
/// use optirotor::core::Individual;
///
/// let mut a = Individual::new(vec![0.02, 0.03, 12.0, 15.0]);
/// assert!(!a.is_evaluated());
/// a.set_fitness(vec![-0.61]).unwrap();
/// assert_eq!(a.objective_values().unwrap(), &[-0.61]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// The gene values.
    genes: Vec<f64>,
    /// The individual's fitness.
    fitness: Fitness,
}

impl Display for Individual {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.fitness {
            Fitness::Invalid => write!(f, "Individual({:?}, not evaluated)", self.genes),
            Fitness::Valid(o) => write!(f, "Individual({:?}, objectives={:?})", self.genes, o),
        }
    }
}

impl Individual {
    /// Create a new individual with an invalid fitness.
    ///
    /// # Arguments
    ///
    /// * `genes`: The gene vector.
    ///
    /// returns: `Individual`
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: Fitness::Invalid,
        }
    }

    /// Create a new evaluated individual. This returns an error if any objective is NaN.
    ///
    /// # Arguments
    ///
    /// * `genes`: The gene vector.
    /// * `objectives`: The objective values.
    ///
    /// returns: `Result<Individual, OError>`
    pub fn with_fitness(genes: Vec<f64>, objectives: Vec<f64>) -> Result<Self, OError> {
        let mut individual = Self::new(genes);
        individual.set_fitness(objectives)?;
        Ok(individual)
    }

    /// The gene vector.
    ///
    /// returns: `&[f64]`
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// The individual's fitness.
    ///
    /// returns: `&Fitness`
    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    /// Whether the individual has a valid fitness.
    ///
    /// returns: `bool`
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_valid()
    }

    /// Assign the objective values. This returns an error if a value is NaN.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objective values.
    ///
    /// returns: `Result<(), OError>`
    pub fn set_fitness(&mut self, objectives: Vec<f64>) -> Result<(), OError> {
        if let Some(i) = objectives.iter().position(|v| v.is_nan()) {
            return Err(OError::NaN("objective".to_string(), format!("#{i}")));
        }
        self.fitness = Fitness::Valid(objectives);
        Ok(())
    }

    /// Get the objective values. This returns an error if the individual has not been evaluated.
    ///
    /// returns: `Result<&[f64], OError>`
    pub fn objective_values(&self) -> Result<&[f64], OError> {
        match &self.fitness {
            Fitness::Valid(values) => Ok(values),
            Fitness::Invalid => Err(OError::InvalidFitness),
        }
    }
}

/// Trait to collect the objective values of a group of individuals.
pub trait Individuals {
    /// Get the objective vector of each individual. This returns an error if any individual has
    /// not been evaluated.
    ///
    /// returns: `Result<Vec<Vec<f64>>, OError>`
    fn objective_vectors(&self) -> Result<Vec<Vec<f64>>, OError>;
}

impl Individuals for [Individual] {
    fn objective_vectors(&self) -> Result<Vec<Vec<f64>>, OError> {
        self.iter()
            .map(|i| i.objective_values().map(|v| v.to_vec()))
            .collect()
    }
}

/// The population containing the individuals of one generation.
#[derive(Debug, Clone, Default)]
pub struct Population(pub Vec<Individual>);

impl Population {
    /// Initialise a population with no individuals.
    ///
    /// returns: `Self`
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialise a population with some individuals.
    ///
    /// # Arguments
    ///
    /// * `individual`: The vector of individuals to add.
    ///
    /// returns: `Self`
    pub fn new_with(individuals: Vec<Individual>) -> Self {
        Self(individuals)
    }

    /// Generate a population of `number_of_individuals` individuals whose genes are drawn
    /// uniformly at random within the gene space. None of the individuals is evaluated.
    ///
    /// # Arguments
    ///
    /// * `space`: The gene space.
    /// * `number_of_individuals`: The number of individuals to add to the population.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Population`
    pub fn init(space: &GeneSpace, number_of_individuals: usize, rng: &mut dyn RngCore) -> Self {
        Self(
            (0..number_of_individuals)
                .map(|_| Individual::new(space.sample(rng)))
                .collect(),
        )
    }

    /// Get the population size.
    ///
    /// return: `usize`
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the population is empty.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the population individuals.
    ///
    /// return: `&[Individual]`
    pub fn individuals(&self) -> &[Individual] {
        self.0.as_ref()
    }

    /// Borrow the population individuals as mutable reference.
    ///
    /// return: `&mut [Individual]`
    pub fn individuals_as_mut(&mut self) -> &mut [Individual] {
        self.0.as_mut()
    }

    /// Add new individuals to the population.
    ///
    /// # Arguments
    ///
    /// * `individuals`: The vector of individuals to add.
    ///
    /// returns: `()`
    pub fn add_new_individuals(&mut self, individuals: Vec<Individual>) {
        self.0.extend(individuals);
    }

    /// Remove the specified range from the population in bulk and return all removed elements.
    ///
    /// # Arguments
    ///
    /// * `range_to_remove`: The range to remove.
    ///
    /// returns: `Vec<Individual>`
    pub fn drain<R>(&mut self, range_to_remove: R) -> Vec<Individual>
    where
        R: RangeBounds<usize>,
    {
        self.0.drain(range_to_remove).collect()
    }

    /// Number of individuals without a valid fitness.
    ///
    /// return: `usize`
    pub fn number_of_invalid(&self) -> usize {
        self.0.iter().filter(|i| !i.is_evaluated()).count()
    }

    /// The champion of the population: the evaluated individual with the smallest first
    /// objective. Ties go to the individual that comes first in the population.
    ///
    /// return: `Option<(usize, &Individual)>`. The champion index and reference or `None` if no
    /// individual has been evaluated.
    pub fn champion(&self) -> Option<(usize, &Individual)> {
        let mut best: Option<(usize, &Individual, f64)> = None;
        for (idx, ind) in self.0.iter().enumerate() {
            let Ok(values) = ind.objective_values() else {
                continue;
            };
            let Some(first) = values.first() else {
                continue;
            };
            match best {
                Some((_, _, best_value)) if *first >= best_value => {}
                _ => best = Some((idx, ind, *first)),
            }
        }
        best.map(|(idx, ind, _)| (idx, ind))
    }
}
