use log::debug;

use crate::core::OError;
use crate::utils::{solve_linear_system, vector_max, vector_min, LinearSolverTolerance};

/// The smallest hyper-plane intercept that is accepted. A smaller (or non-finite) intercept is
/// replaced by the maximum translated objective of its axis.
const MIN_INTERCEPT: f64 = 1e-3;

/// This implements "Algorithm 2" in the NSGA-III paper which normalises the objective vectors
/// using the ideal point and the intercepts of the hyper-plane passing through the extreme
/// points and crossing the objective space axis.
///
/// The ideal point is calculated from the vectors being normalised only; no point from
/// previous generations is used.
pub(crate) struct Normalise<'a> {
    /// The objective vectors to normalise.
    objectives: &'a [Vec<f64>],
    /// The number of objectives.
    number_of_objectives: usize,
}

/// Calculated points used in the normalisation.
#[derive(Debug)]
pub(crate) struct NormalisationPoints {
    /// The ideal point.
    pub(crate) ideal_point: Vec<f64>,
    /// The extreme points used to calculate the hyper-plane intercepts.
    pub(crate) extreme_points: Vec<Vec<f64>>,
    /// The objective intercepts of the plane.
    pub(crate) intercepts: Vec<f64>,
    /// The normalised objectives, in the same order as the input vectors.
    pub(crate) normalised_objectives: Vec<Vec<f64>>,
}

impl<'a> Normalise<'a> {
    /// Build the [`Normalise`] struct. This returns an error if there are no vectors or they have
    /// a different size.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objective vectors to normalise.
    ///
    /// returns: `Result<Normalise, OError>`
    pub fn new(objectives: &'a [Vec<f64>]) -> Result<Self, OError> {
        let name = "NSGA3-Normalise".to_string();
        let number_of_objectives = match objectives.first() {
            None => {
                return Err(OError::AlgorithmRun(
                    name,
                    "The vector of objectives is empty".to_string(),
                ))
            }
            Some(first) => first.len(),
        };
        if number_of_objectives == 0 || objectives.iter().any(|o| o.len() != number_of_objectives)
        {
            return Err(OError::AlgorithmRun(
                name,
                "All the objective vectors must have the same non-zero size".to_string(),
            ));
        }

        Ok(Self {
            objectives,
            number_of_objectives,
        })
    }

    /// Normalise the objectives. The objectives are first translated with respect to the ideal
    /// point and then scaled using the intercepts of the linear hyper-plane passing through the
    /// extreme points.
    ///
    /// returns: `Result<NormalisationPoints, OError>`
    pub(crate) fn calculate(&self) -> Result<NormalisationPoints, OError> {
        // Step 2 - ideal point as the minimum value of each objective
        let ideal_point = (0..self.number_of_objectives)
            .map(|j| vector_min(&self.objective_column(j)))
            .collect::<Result<Vec<f64>, OError>>()?;
        debug!("Set ideal point to {:?}", ideal_point);

        // Step 3 - translate the objectives with respect to the ideal point (f'_j(x))
        let translated: Vec<Vec<f64>> = self
            .objectives
            .iter()
            .map(|o| o.iter().zip(&ideal_point).map(|(v, z)| v - z).collect())
            .collect();

        // Step 4 - the extreme point of each axis minimises the achievement scalarising function
        let mut extreme_points = vec![];
        for j in 0..self.number_of_objectives {
            let mut weights = vec![1e-6; self.number_of_objectives];
            weights[j] = 1.0;

            let mut min_value = f64::INFINITY;
            let mut ind_index = 0;
            for (x_idx, f_j) in translated.iter().enumerate() {
                let value = Self::asf(f_j, &weights)?;
                if value < min_value {
                    min_value = value;
                    ind_index = x_idx;
                }
            }
            extreme_points.push(translated[ind_index].clone());
        }
        debug!("Set extreme points to {:?}", extreme_points);

        // Step 6 - intercepts with the least-square method
        let plane_intercepts = Self::calculate_plane_intercepts(
            &extreme_points,
            Some(LinearSolverTolerance::default()),
        );
        let max_points = Self::calculate_max_objectives(&translated)?;
        let intercepts = Self::valid_intercepts(plane_intercepts, &max_points);
        debug!("Set intercepts to {:?}", intercepts);

        // Step 7 - normalise the translated objectives
        let normalised_objectives = translated
            .iter()
            .map(|o| o.iter().zip(&intercepts).map(|(v, a)| v / a).collect())
            .collect();

        Ok(NormalisationPoints {
            ideal_point,
            extreme_points,
            intercepts,
            normalised_objectives,
        })
    }

    /// Collect the values of one objective.
    fn objective_column(&self, j: usize) -> Vec<f64> {
        self.objectives.iter().map(|o| o[j]).collect()
    }

    /// Use the least square method to calculate the coefficients of the equation of the plane
    /// passing through the vector of `points`. For example, for a 3D system the equation being
    /// used is: $ax + by + cz = 1$. The coefficient vector $x = [a, b, c]$ is found by solving
    /// the linear system $A \cdot x = b$ where `A` is
    ///
    /// ```text
    ///          | x_0   y_0   z_0 |
    ///      A = | x_1   y_1   z_1 |
    ///          |       ...       |
    ///          | x_n   y_n   z_n |
    /// ```
    /// `n` the size of `points` and $b = [1, 1, 1]$. The intercepts are then calculated as the
    /// inverse of `x` as $1/x$.
    ///
    /// # Arguments
    ///
    /// * `points`: The point coordinates passing through the plane to calculate.
    /// * `tolerance`: The tolerance of the linear solver to accept whether the found solution is
    ///    acceptable.
    ///
    /// returns: `Option<Vec<f64>>`: The intercept values for each axis or `None` if the system
    /// cannot be solved within the tolerance.
    fn calculate_plane_intercepts(
        points: &[Vec<f64>],
        tolerance: Option<LinearSolverTolerance>,
    ) -> Option<Vec<f64>> {
        let b = vec![1.0; points.len()];
        let plane_coefficients = match solve_linear_system(points, &b, tolerance) {
            Ok(c) => c,
            Err(e) => {
                debug!("Cannot calculate the plane intercepts: {e}");
                return None;
            }
        };
        debug!("Plane coefficients {:?}", plane_coefficients);

        Some(plane_coefficients.iter().map(|v| 1.0 / v).collect())
    }

    /// Replace the intercepts that are not finite or are smaller than [`MIN_INTERCEPT`] with the
    /// maximum translated objective of the same axis. All the maximum values are used when the
    /// plane could not be calculated.
    ///
    /// # Arguments
    ///
    /// * `intercepts`: The plane intercepts.
    /// * `max_points`: The maximum translated objective of each axis.
    ///
    /// returns: `Vec<f64>`
    fn valid_intercepts(intercepts: Option<Vec<f64>>, max_points: &[f64]) -> Vec<f64> {
        let Some(intercepts) = intercepts else {
            debug!("Degenerate plane, using the maximum points as intercepts");
            return max_points.to_vec();
        };
        intercepts
            .iter()
            .zip(max_points)
            .map(|(a, max)| {
                if a.is_finite() && *a >= MIN_INTERCEPT {
                    *a
                } else {
                    *max
                }
            })
            .collect()
    }

    /// Calculate the maximum value for each translated objective. The value is never smaller than
    /// the machine epsilon.
    ///
    /// # Arguments
    ///
    /// * `translated`: The translated objectives.
    ///
    /// return: `Result<Vec<f64>, OError>`
    fn calculate_max_objectives(translated: &[Vec<f64>]) -> Result<Vec<f64>, OError> {
        let number_of_objectives = translated.first().map_or(0, |o| o.len());
        (0..number_of_objectives)
            .map(|j| {
                let mut obj_j_values: Vec<f64> = translated.iter().map(|o| o[j]).collect();
                obj_j_values.push(f64::EPSILON);
                vector_max(&obj_j_values)
            })
            .collect()
    }

    /// Calculate the achievement scalarising function with weight vector `w`. This is Eq. 4 in the
    /// paper.
    ///
    /// # Arguments
    ///
    /// * `translated_objective`: The translated objective for an individual. This is f'_j(x).
    /// * `weights`: The weight vector.
    ///
    /// returns: `Result<f64, OError>`
    fn asf(translated_objective: &[f64], weights: &[f64]) -> Result<f64, OError> {
        let asf: Vec<f64> = translated_objective
            .iter()
            .zip(weights)
            .map(|(x, w)| x / w)
            .collect();
        vector_max(&asf)
    }
}

#[cfg(test)]
mod test {
    use crate::algorithms::nsga3::normalise::Normalise;
    use crate::core::test_utils::assert_approx_array_eq;
    use crate::utils::LinearSolverTolerance;

    #[test]
    /// The points lie on the plane x/3 + y/1.5 + z/6 = 1.
    fn test_intercepts() {
        let points = vec![
            vec![1.0, 0.5, 2.0],
            vec![0.5, 1.0, 1.0],
            vec![2.0, 0.2, 1.2],
            vec![0.3, 0.3, 4.2],
            vec![1.5, 0.9, -0.6],
        ];
        let intercepts =
            Normalise::calculate_plane_intercepts(&points, Some(LinearSolverTolerance::default()))
                .unwrap();
        assert_approx_array_eq(&intercepts, &[3.0, 1.5, 6.0], None);
    }

    #[test]
    /// Points were generated from numpy from uniform distribution with normal distributed noise
    /// on z coordinates (scale=1). Plane was generated to have slope of -2 in the x direction and
    /// -3 in the y direction. The least-squares plane does not pass through the points and is
    /// rejected when its residual is checked.
    fn test_noisy_intercepts() {
        let points = vec![
            vec![3.3817863, 0.40604364, -2.2899773],
            vec![4.1741924, 0.92094903, -5.91434001],
            vec![3.42070899, 0.90266942, -3.81063094],
            vec![1.11301849, 0.94849208, 0.17140235],
            vec![9.08303894, 0.74599477, -16.14020622],
            vec![0.98976491, 0.84847939, 0.82864021],
            vec![7.53579489, 0.73723563, -11.72284018],
            vec![6.96274164, 0.59449793, -10.71963907],
            vec![5.60255823, 1.69973452, -12.49841699],
            vec![6.16815342, 0.66601692, -11.63169056],
        ];

        let tol = LinearSolverTolerance {
            relative: 0.01,
            absolute: 0.01,
        };
        assert!(Normalise::calculate_plane_intercepts(&points, Some(tol)).is_none());
        assert!(Normalise::calculate_plane_intercepts(
            &points,
            Some(LinearSolverTolerance::default())
        )
        .is_none());

        let intercepts = Normalise::calculate_plane_intercepts(&points, None).unwrap();
        assert_approx_array_eq(&intercepts, &[3.38096778, 1.61009025, 7.58962871], None);
    }

    #[test]
    /// Only the invalid intercepts are replaced by the maximum of their axis.
    fn test_intercept_fallback() {
        let max_points = [3.0, 4.0, 5.0];
        assert_eq!(
            Normalise::valid_intercepts(Some(vec![2.0, -1.0, f64::INFINITY]), &max_points),
            vec![2.0, 4.0, 5.0]
        );
        assert_eq!(
            Normalise::valid_intercepts(Some(vec![0.0005, 1.0, f64::NAN]), &max_points),
            vec![3.0, 1.0, 5.0]
        );
        assert_eq!(
            Normalise::valid_intercepts(None, &max_points),
            vec![3.0, 4.0, 5.0]
        );
    }

    #[test]
    /// Points on the plane x + y = 2 (after translation) are scaled by the intercepts.
    fn test_normalise_with_plane() {
        let objectives = vec![
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![2.5, 2.5],
        ];
        let n = Normalise::new(&objectives).unwrap();
        let points = n.calculate().unwrap();

        assert_approx_array_eq(&points.ideal_point, &[1.0, 1.0], None);
        assert_approx_array_eq(&points.extreme_points[0], &[2.0, 0.0], None);
        assert_approx_array_eq(&points.extreme_points[1], &[0.0, 2.0], None);
        assert_approx_array_eq(&points.intercepts, &[2.0, 2.0], None);
        assert_approx_array_eq(&points.normalised_objectives[1], &[0.5, 0.5], None);
        assert_approx_array_eq(&points.normalised_objectives[3], &[0.75, 0.75], None);
    }

    #[test]
    /// Identical vectors give a degenerate plane and the maximum values are used instead.
    fn test_degenerate_plane() {
        let objectives = vec![vec![0.4, 0.4], vec![0.4, 0.4]];
        let points = Normalise::new(&objectives).unwrap().calculate().unwrap();
        assert_approx_array_eq(&points.intercepts, &[f64::EPSILON, f64::EPSILON], None);
        for o in points.normalised_objectives {
            assert_approx_array_eq(&o, &[0.0, 0.0], None);
        }

        // one objective: the range is used
        let objectives = vec![vec![0.1], vec![0.3], vec![0.05]];
        let points = Normalise::new(&objectives).unwrap().calculate().unwrap();
        assert_approx_array_eq(&points.intercepts, &[0.25], None);
        assert_approx_array_eq(&points.normalised_objectives[1], &[1.0], None);
        assert_approx_array_eq(&points.normalised_objectives[2], &[0.0], None);
    }

    #[test]
    fn test_new_errors() {
        assert!(Normalise::new(&[]).is_err());
        assert!(Normalise::new(&[vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
