use std::fmt;
use std::fmt::{Display, Formatter};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::core::OError;

/// The lower and upper bounds of each gene in a solution vector. The gene at position `i` of any
/// individual is always constrained to `[lower[i], upper[i]]`.
///
/// # Example
/// ```
/// use optirotor::core::GeneSpace;
///
/// // six chords between 5 mm and 10 cm followed by six twist angles between 0 and 90 deg
/// let lower = [vec![0.005; 6], vec![0.0; 6]].concat();
/// let upper = [vec![0.1; 6], vec![90.0; 6]].concat();
/// let space = GeneSpace::new(lower, upper).unwrap();
/// assert_eq!(space.number_of_genes(), 12);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneSpace {
    /// The lower bound of each gene.
    lower: Vec<f64>,
    /// The upper bound of each gene.
    upper: Vec<f64>,
}

impl GeneSpace {
    /// Create the gene space. This returns an error if the vectors are empty, their sizes differ,
    /// a bound is not finite or a lower bound is larger than its upper bound. Equal bounds are
    /// allowed and fix the gene value.
    ///
    /// # Arguments
    ///
    /// * `lower`: The lower bound of each gene.
    /// * `upper`: The upper bound of each gene.
    ///
    /// returns: `Result<GeneSpace, OError>`
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, OError> {
        let space = Self { lower, upper };
        space.validate()?;
        Ok(space)
    }

    /// Create a gene space where all `number_of_genes` genes share the same bounds.
    ///
    /// # Arguments
    ///
    /// * `number_of_genes`: The number of genes.
    /// * `lower`: The lower bound.
    /// * `upper`: The upper bound.
    ///
    /// returns: `Result<GeneSpace, OError>`
    pub fn uniform(number_of_genes: usize, lower: f64, upper: f64) -> Result<Self, OError> {
        Self::new(vec![lower; number_of_genes], vec![upper; number_of_genes])
    }

    /// Check the bounds. This is also needed when the space is deserialised from a configuration
    /// file.
    ///
    /// returns: `Result<(), OError>`
    pub fn validate(&self) -> Result<(), OError> {
        if self.lower.is_empty() {
            return Err(OError::GeneSpace(
                "At least one gene bound must be provided".to_string(),
            ));
        }
        if self.lower.len() != self.upper.len() {
            return Err(OError::GeneSpace(format!(
                "The number of lower bounds ({}) must match the number of upper bounds ({})",
                self.lower.len(),
                self.upper.len()
            )));
        }
        for (i, (low, up)) in self.lower.iter().zip(&self.upper).enumerate() {
            if !low.is_finite() || !up.is_finite() {
                return Err(OError::GeneSpace(format!(
                    "The bounds of gene #{i} must be finite numbers"
                )));
            }
            if low > up {
                return Err(OError::TooLargeLowerBound(low.to_string(), up.to_string()));
            }
        }
        Ok(())
    }

    /// The number of genes in a solution vector.
    ///
    /// returns: `usize`
    pub fn number_of_genes(&self) -> usize {
        self.lower.len()
    }

    /// The lower bounds.
    ///
    /// returns: `&[f64]`
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// The upper bounds.
    ///
    /// returns: `&[f64]`
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// The lower and upper bounds of the gene at position `index`.
    ///
    /// # Arguments
    ///
    /// * `index`: The gene index.
    ///
    /// returns: `(f64, f64)`
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        (self.lower[index], self.upper[index])
    }

    /// Clamp a value into the bounds of the gene at position `index`.
    ///
    /// # Arguments
    ///
    /// * `index`: The gene index.
    /// * `value`: The value to clamp.
    ///
    /// returns: `f64`
    pub fn clamp(&self, index: usize, value: f64) -> f64 {
        f64::min(f64::max(value, self.lower[index]), self.upper[index])
    }

    /// Whether all the genes are within the bounds. This is `false` if the vector size does not
    /// match the number of genes.
    ///
    /// # Arguments
    ///
    /// * `genes`: The gene vector.
    ///
    /// returns: `bool`
    pub fn contains(&self, genes: &[f64]) -> bool {
        genes.len() == self.number_of_genes()
            && genes
                .iter()
                .enumerate()
                .all(|(i, g)| (self.lower[i]..=self.upper[i]).contains(g))
    }

    /// Draw a gene vector uniformly at random within the bounds.
    ///
    /// # Arguments
    ///
    /// * `rng`: The random number generator.
    ///
    /// returns: `Vec<f64>`
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(low, up)| {
                if low == up {
                    *low
                } else {
                    rng.gen_range(*low..=*up)
                }
            })
            .collect()
    }
}

impl Display for GeneSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GeneSpace with {} genes", self.number_of_genes())
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::{GeneSpace, OError};

    #[test]
    /// Check the validation of the bounds.
    fn test_new_gene_space_errors() {
        assert!(matches!(
            GeneSpace::new(vec![], vec![]),
            Err(OError::GeneSpace(_))
        ));
        assert!(matches!(
            GeneSpace::new(vec![0.0, 1.0], vec![1.0]),
            Err(OError::GeneSpace(_))
        ));
        assert!(matches!(
            GeneSpace::new(vec![2.0], vec![1.0]),
            Err(OError::TooLargeLowerBound(_, _))
        ));
        assert!(GeneSpace::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(GeneSpace::new(vec![1.0], vec![1.0]).is_ok());
    }

    #[test]
    /// Sampled genes are always within bounds and fixed genes keep their value.
    fn test_sample() {
        let space = GeneSpace::new(vec![0.005, -3.0, 4.0], vec![0.1, 90.0, 4.0]).unwrap();
        let mut rng = get_rng(Some(3));
        for _ in 0..500 {
            let genes = space.sample(rng.as_mut());
            assert_eq!(genes.len(), 3);
            assert!(space.contains(&genes));
            assert_eq!(genes[2], 4.0);
        }
    }

    #[test]
    /// Test the clamp and contains helpers.
    fn test_clamp() {
        let space = GeneSpace::uniform(2, 0.0, 1.0).unwrap();
        assert_eq!(space.clamp(0, -0.5), 0.0);
        assert_eq!(space.clamp(1, 1.5), 1.0);
        assert_eq!(space.clamp(1, 0.3), 0.3);
        assert!(!space.contains(&[0.5]));
        assert!(!space.contains(&[0.5, 1.1]));
    }
}
