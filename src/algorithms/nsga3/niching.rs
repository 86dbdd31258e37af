use log::debug;

use crate::algorithms::nsga3::associate::Association;
use crate::core::OError;

/// This implements "Algorithm 4" in the NSGA-III paper which picks the individuals of the
/// critical front to add to the new population based on the reference point association and
/// minimum distance.
///
/// The selection is deterministic: among the reference points with the lowest niche count the
/// one with the lowest index is used, and among its candidates the closest one is picked (ties
/// go to the candidate found first).
pub(crate) struct Niching<'a> {
    /// The associations of the candidates from the critical front.
    candidates: &'a [Association],
    /// The number of already-selected individuals associated with each reference point.
    niche_count: Vec<usize>,
    /// The number of candidates to pick.
    missing_item_count: usize,
}

impl<'a> Niching<'a> {
    /// Niching algorithm.
    ///
    /// # Arguments
    ///
    /// * `candidates`: The associations of the candidates in the critical front.
    /// * `niche_count`: The number of selected individuals associated with each reference point.
    /// * `number_of_individuals_to_add`: The number of candidates to pick.
    ///
    /// returns: `Result<Niching, OError>`
    pub fn new(
        candidates: &'a [Association],
        niche_count: Vec<usize>,
        number_of_individuals_to_add: usize,
    ) -> Result<Self, OError> {
        let name = "NSGA3-Niching".to_string();
        if niche_count.is_empty() {
            return Err(OError::AlgorithmRun(
                name,
                "The niche count vector is empty".to_string(),
            ));
        }
        if candidates.len() < number_of_individuals_to_add {
            return Err(OError::AlgorithmRun(
                name,
                format!(
                    "The number of individuals to add ({number_of_individuals_to_add}) is larger than the number of potential individuals ({})",
                    candidates.len()
                ),
            ));
        }
        if let Some(a) = candidates
            .iter()
            .find(|a| a.reference_point_index >= niche_count.len())
        {
            return Err(OError::AlgorithmRun(
                name,
                format!(
                    "The reference point #{} does not exist",
                    a.reference_point_index
                ),
            ));
        }

        Ok(Self {
            candidates,
            niche_count,
            missing_item_count: number_of_individuals_to_add,
        })
    }

    /// Pick the candidates.
    ///
    /// return: `Result<Vec<usize>, OError>`: the indexes of the picked candidates in the order
    /// they were picked.
    pub fn calculate(mut self) -> Result<Vec<usize>, OError> {
        let name = "NSGA3-Niching".to_string();
        let mut available = vec![true; self.candidates.len()];
        // reference points with no candidates left are excluded
        let mut eligible = vec![true; self.niche_count.len()];
        let mut picked = Vec::with_capacity(self.missing_item_count);

        while picked.len() < self.missing_item_count {
            // step 3-4 - the reference point with the minimum niche count
            let mut j_hat: Option<usize> = None;
            for (j, count) in self.niche_count.iter().enumerate() {
                if !eligible[j] {
                    continue;
                }
                match j_hat {
                    Some(best) if self.niche_count[best] <= *count => {}
                    _ => j_hat = Some(j),
                }
            }
            let j_hat = j_hat.ok_or_else(|| {
                OError::AlgorithmRun(
                    name.clone(),
                    "No reference point is associated with the remaining candidates".to_string(),
                )
            })?;

            // step 5-8 - the closest candidate associated with j_hat
            let mut best: Option<usize> = None;
            for (ci, a) in self.candidates.iter().enumerate() {
                if !available[ci] || a.reference_point_index != j_hat {
                    continue;
                }
                match best {
                    Some(b) if self.candidates[b].distance <= a.distance => {}
                    _ => best = Some(ci),
                }
            }

            match best {
                Some(ci) => {
                    // step 12
                    available[ci] = false;
                    self.niche_count[j_hat] += 1;
                    picked.push(ci);
                    debug!(
                        "Added candidate #{ci} to population - reference point #{j_hat}, distance = {}",
                        self.candidates[ci].distance
                    );
                }
                None => {
                    // step 15
                    debug!("Excluding ref point index {j_hat} - no candidates associated with it");
                    eligible[j_hat] = false;
                }
            }
        }

        Ok(picked)
    }
}
