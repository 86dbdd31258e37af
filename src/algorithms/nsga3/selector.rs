use log::debug;

use crate::algorithms::nsga3::associate::{check_bounds, AssociateToRefPoint};
use crate::algorithms::nsga3::niching::Niching;
use crate::algorithms::nsga3::normalise::Normalise;
use crate::core::{Individual, Individuals, OError};
use crate::utils::fast_non_dominated_sort;

/// The NSGA-III environmental selection. This picks the individuals of the next generation from
/// a pool of evaluated individuals using non-dominated sorting and, for the front that does not
/// fit entirely, the association of each individual to a set of reference directions.
///
/// The selection holds no state besides the reference points and is deterministic: the same
/// pool always gives the same selection.
///
/// Implemented based on:
/// > K. Deb and H. Jain, "An Evolutionary Many-Objective Optimization Algorithm Using
/// > Reference-Point-Based Non-dominated Sorting Approach, Part I: Solving Problems With Box
/// > Constraints," in IEEE Transactions on Evolutionary Computation, vol. 18, no. 4, pp. 577-601,
/// > Aug. 2014, doi: 10.1109/TEVC.2013.2281535.
///
/// # Example
/// ```
/// use optirotor::algorithms::Nsga3Selector;
/// use optirotor::core::Individual;
///
/// let selector = Nsga3Selector::new(vec![vec![1.0]]).unwrap();
/// let pool: Vec<Individual> = [0.1, 0.2, 0.05, 0.3]
///     .iter()
///     .map(|o| Individual::with_fitness(vec![*o], vec![*o]).unwrap())
///     .collect();
/// let selected = selector.select(pool, 2).unwrap();
/// assert_eq!(selected.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Nsga3Selector {
    /// The reference points.
    reference_points: Vec<Vec<f64>>,
}

impl Nsga3Selector {
    /// Create the selector. This returns an error if there are no reference points, they have a
    /// different size or their coordinates are not between 0 and 1.
    ///
    /// # Arguments
    ///
    /// * `reference_points`: The reference points (for example from
    ///    [`crate::utils::DasDarren1998`]).
    ///
    /// returns: `Result<Nsga3Selector, OError>`
    pub fn new(reference_points: Vec<Vec<f64>>) -> Result<Self, OError> {
        let name = "NSGA3".to_string();
        let dim = match reference_points.first() {
            None => {
                return Err(OError::SurvivalOperator(
                    name,
                    "At least one reference point is needed".to_string(),
                ))
            }
            Some(p) => p.len(),
        };
        if dim == 0 || reference_points.iter().any(|p| p.len() != dim) {
            return Err(OError::SurvivalOperator(
                name,
                "All the reference points must have the same non-zero size".to_string(),
            ));
        }
        for point in &reference_points {
            check_bounds(point)?;
        }

        Ok(Self { reference_points })
    }

    /// The reference points.
    ///
    /// returns: `&[Vec<f64>]`
    pub fn reference_points(&self) -> &[Vec<f64>] {
        &self.reference_points
    }

    /// Select `mu` individuals from the pool. The individuals are moved to the output with their
    /// fitness. This returns an error if an individual has not been evaluated, its number of
    /// objectives does not match the reference points or the pool has less than `mu` individuals.
    ///
    /// # Arguments
    ///
    /// * `pool`: The individuals to select from.
    /// * `mu`: The number of individuals to select.
    ///
    /// returns: `Result<Vec<Individual>, OError>`
    pub fn select(&self, pool: Vec<Individual>, mu: usize) -> Result<Vec<Individual>, OError> {
        let name = "NSGA3".to_string();
        if pool.len() < mu {
            return Err(OError::SurvivalOperator(
                name,
                format!(
                    "The pool has {} individuals but {mu} must be selected",
                    pool.len()
                ),
            ));
        }
        let objectives = pool.objective_vectors()?;
        let dim = self.reference_points[0].len();
        if objectives.iter().any(|o| o.len() != dim) {
            return Err(OError::SurvivalOperator(
                name,
                format!("All the individuals must have {dim} objectives"),
            ));
        }
        if mu == 0 {
            return Ok(Vec::new());
        }

        // Step 1-3 - add whole fronts while they fit
        let sorting = fast_non_dominated_sort(&objectives)?;
        let mut accepted: Vec<usize> = Vec::with_capacity(mu);
        let mut critical: Vec<usize> = Vec::new();
        for front in sorting.front_indexes {
            if accepted.len() + front.len() <= mu {
                accepted.extend(front);
                if accepted.len() == mu {
                    break;
                }
            } else {
                critical = front;
                break;
            }
        }
        debug!(
            "Accepted {} individuals; the critical front has {} individuals",
            accepted.len(),
            critical.len()
        );

        let selected_indexes = if accepted.len() == mu {
            accepted
        } else {
            let picked = self.pick_from_critical_front(&objectives, &accepted, &critical, mu)?;
            accepted.extend(picked.into_iter().map(|ci| critical[ci]));
            accepted
        };

        // move the selected individuals out of the pool
        let mut pool: Vec<Option<Individual>> = pool.into_iter().map(Some).collect();
        selected_indexes
            .into_iter()
            .map(|idx| {
                pool[idx].take().ok_or_else(|| {
                    OError::SurvivalOperator(
                        "NSGA3".to_string(),
                        format!("The individual #{idx} was selected twice"),
                    )
                })
            })
            .collect()
    }

    /// Pick the individuals of the critical front with normalisation, association and niching.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objectives of the pool.
    /// * `accepted`: The indexes of the accepted individuals.
    /// * `critical`: The indexes of the individuals in the critical front.
    /// * `mu`: The number of individuals to select.
    ///
    /// returns: `Result<Vec<usize>, OError>`: the positions in `critical` of the picked
    /// individuals.
    fn pick_from_critical_front(
        &self,
        objectives: &[Vec<f64>],
        accepted: &[usize],
        critical: &[usize],
        mu: usize,
    ) -> Result<Vec<usize>, OError> {
        let candidate_objectives: Vec<Vec<f64>> = accepted
            .iter()
            .chain(critical)
            .map(|idx| objectives[*idx].clone())
            .collect();

        // Step 4 - normalise the objectives of S_t
        let points = Normalise::new(&candidate_objectives)?.calculate()?;

        // Step 5 - associate the individuals with the reference points
        let associations =
            AssociateToRefPoint::new(&points.normalised_objectives, &self.reference_points)?
                .calculate()?;
        let (accepted_associations, critical_associations) = associations.split_at(accepted.len());

        // Step 6 - niche count of the accepted individuals
        let mut niche_count = vec![0; self.reference_points.len()];
        for a in accepted_associations {
            niche_count[a.reference_point_index] += 1;
        }
        debug!("Niche count {:?}", niche_count);

        // Step 7 - niching
        Niching::new(critical_associations, niche_count, mu - accepted.len())?.calculate()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::Nsga3Selector;
    use crate::core::test_utils::individuals_from_obj_values;
    use crate::core::{Individual, OError};
    use crate::utils::{DasDarren1998, NumberOfPartitions};

    /// The objective values of the selected individuals.
    fn objectives(selected: &[Individual]) -> Vec<Vec<f64>> {
        selected
            .iter()
            .map(|i| i.objective_values().unwrap().to_vec())
            .collect()
    }

    /// The genes of the selected individuals (their position in the pool).
    fn positions(selected: &[Individual]) -> Vec<usize> {
        selected.iter().map(|i| i.genes()[0] as usize).collect()
    }

    fn selector(m: usize, p: usize) -> Nsga3Selector {
        let ref_points = DasDarren1998::new(m, &NumberOfPartitions::OneLayer(p))
            .unwrap()
            .get_weights();
        Nsga3Selector::new(ref_points).unwrap()
    }

    #[test]
    /// With one objective the best individuals are selected. The two fronts of the duplicated
    /// value fill the population before the critical front.
    fn test_single_objective() {
        let pool = individuals_from_obj_values(&[
            vec![0.1],
            vec![0.2],
            vec![0.05],
            vec![0.3],
            vec![0.05],
            vec![0.15],
        ]);
        let selected = selector(1, 12).select(pool, 4).unwrap();
        let mut values: Vec<f64> = objectives(&selected).into_iter().flatten().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(values, vec![0.05, 0.05, 0.1, 0.15]);
        assert_eq!(positions(&selected)[0..2], [2, 4]);
    }

    #[test]
    /// Fronts filling the population exactly are returned without niching.
    fn test_exact_fronts() {
        let pool = individuals_from_obj_values(&[
            vec![1.0, 4.0],
            vec![4.0, 1.0],
            vec![5.0, 5.0],
            vec![2.0, 2.0],
        ]);
        let selected = selector(2, 4).select(pool, 3).unwrap();
        assert_eq!(positions(&selected), vec![0, 1, 3]);
    }

    #[test]
    /// The critical front is spread along the reference directions.
    fn test_niching_spread() {
        // all in the first front
        let pool = individuals_from_obj_values(&[
            vec![0.0, 1.0],
            vec![0.05, 0.95],
            vec![0.5, 0.5],
            vec![0.52, 0.48],
            vec![1.0, 0.0],
            vec![0.95, 0.05],
        ]);
        let selected = selector(2, 2).select(pool, 3).unwrap();
        let mut p = positions(&selected);
        p.sort();
        // one individual for each of [0, 1], [0.5, 0.5] and [1, 0]
        assert_eq!(p, vec![0, 2, 4]);
    }

    #[test]
    /// Selecting a population that is already the selection output returns the same set.
    fn test_idempotent() {
        let pool = individuals_from_obj_values(&[
            vec![0.3, 0.9],
            vec![0.1, 1.2],
            vec![0.8, 0.2],
            vec![0.5, 0.5],
            vec![0.9, 0.9],
            vec![0.4, 0.7],
            vec![1.1, 0.1],
            vec![0.6, 0.6],
        ]);
        let s = selector(2, 6);
        let first = s.select(pool, 5).unwrap();
        let second = s.select(first.clone(), 5).unwrap();
        let mut a = positions(&first);
        let mut b = positions(&second);
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    /// The same pool gives the same selection.
    fn test_deterministic() {
        let values: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let x = i as f64 / 29.0;
                vec![x, (1.0 - x).powi(2) + 0.01 * (i % 3) as f64, 0.5 * x]
            })
            .collect();
        let s = selector(3, 4);
        let a = s.select(individuals_from_obj_values(&values), 12).unwrap();
        let b = s.select(individuals_from_obj_values(&values), 12).unwrap();
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_errors() {
        let s = selector(2, 4);
        let pool = individuals_from_obj_values(&[vec![1.0, 2.0]]);
        assert!(matches!(
            s.select(pool, 2),
            Err(OError::SurvivalOperator(_, _))
        ));

        let pool = vec![Individual::new(vec![0.0]), Individual::new(vec![1.0])];
        assert!(matches!(s.select(pool, 1), Err(OError::InvalidFitness)));

        let pool = individuals_from_obj_values(&[vec![1.0], vec![2.0]]);
        assert!(s.select(pool, 1).is_err());

        assert!(Nsga3Selector::new(vec![]).is_err());
        assert!(Nsga3Selector::new(vec![vec![0.5, 0.5], vec![1.0]]).is_err());
        assert!(Nsga3Selector::new(vec![vec![2.0, 0.0]]).is_err());
    }
}
