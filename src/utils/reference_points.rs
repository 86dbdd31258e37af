use serde::{Deserialize, Serialize};

use crate::core::OError;

/// Calculate the binomial coefficient. This gives the number of `k`-subsets possible out of a
/// set of `n` distinct items. See <https://mathworld.wolfram.com/BinomialCoefficient.html>. Code
/// adapted from <https://blog.plover.com/math/choose.html>.
///
/// # Arguments
///
/// * `n`: The number of possibilities.
/// * `k`: The number of outcomes.
///
/// returns: `u64`
fn binomial_coefficient(mut n: u64, k: u64) -> u64 {
    let mut r: u64 = 1;
    if k > n {
        0
    } else {
        for d in 1..=k {
            r *= n;
            n -= 1;
            r /= d;
        }
        r
    }
}

/// Define the number of partitions for the two layers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TwoLayerPartitions {
    /// This is the number of partitions to use in the boundary layer.
    pub boundary_layer: usize,
    /// This is the number of partitions to use in the inner layer.
    pub inner_layer: usize,
    /// Control the size of the inner layer. This defaults to 0.5 which means that the inner layer
    /// is shrunk by half towards the simplex centre.
    pub scaling: Option<f64>,
}

/// Define the number of partitions to use to generate the reference points. You can create:
///  - 1 layer or set of points with a constant uniform gaps with [`NumberOfPartitions::OneLayer`].
///  - 2 layers of points with each layer having a different gap with [`NumberOfPartitions::TwoLayers`].
///    Use this approach with many objectives (4 or more) to reduce the number of reference points
///    while keeping points in the inner area of the simplex.
#[derive(Serialize, Clone, Deserialize, Debug, PartialEq)]
pub enum NumberOfPartitions {
    /// Create only one layer of points by specifying the number of uniform gaps between two
    /// consecutive points along all objective axis on the hyper-plane.
    OneLayer(usize),
    /// Create two sets of points with two different gap values. The two sets are generated
    /// independently and merged into one final set.
    TwoLayers(TwoLayerPartitions),
}

/// Derive the reference points or weights using the methodology suggested in Section 5.2 in the
/// Das & Dennis (1998) paper:
///
/// > Indraneel Das and J. E. Dennis. Normal-Boundary Intersection: A New Method for Generating the
/// > Pareto Surface in Nonlinear Multicriteria Optimization Problems. SIAM Journal on Optimization.
/// > 1998 8:3, 631-657. <https://doi.org/10.1137/S1052623496307510>
///
/// The points are all the vectors of non-negative integers summing to the number of partitions
/// `P`, divided by `P`. They lie on the unit simplex, are returned in lexicographic order and
/// contain no duplicates.
///
/// # Example
/// ```
/// use optirotor::utils::{DasDarren1998, NumberOfPartitions};
/// use optirotor::core::OError;
///
/// fn main() -> Result<(), OError> {
///     // Consider the case of a 3D hyperplane with 3 objectives
///     let number_of_objectives = 3;
///     // Each objective axis is split into 5 gaps of equal size.
///     let partitions = NumberOfPartitions::OneLayer(5);
///     let m = DasDarren1998::new(number_of_objectives, &partitions)?;
///     assert_eq!(m.number_of_points(), 21);
///
///     let weights = m.get_weights();
///     println!("Weights = {:?}", weights);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct DasDarren1998 {
    /// The number of problem objectives.
    number_of_objectives: usize,
    /// The number of uniform gaps between two consecutive points along all objective axis on the
    /// hyperplane. With this option you can create one or two layer of points with different spacing.
    number_of_partitions: NumberOfPartitions,
}

impl DasDarren1998 {
    /// Initialise the Das & Darren approach to calculate reference points or weights. This
    /// returns an error if the number of objectives or partitions is zero.
    ///
    /// # Arguments
    ///
    /// * `number_of_objectives`: The number of problem objectives.
    /// * `number_of_partitions`: The number of uniform gaps between two consecutive points along
    /// all objective axis on the hyperplane.
    ///
    /// returns: `Result<DasDarren1998, OError>`
    pub fn new(
        number_of_objectives: usize,
        number_of_partitions: &NumberOfPartitions,
    ) -> Result<Self, OError> {
        if number_of_objectives == 0 {
            return Err(OError::ReferencePoints(
                "The number of objectives must be at least 1".to_string(),
            ));
        }
        match &number_of_partitions {
            NumberOfPartitions::OneLayer(p) => {
                if *p == 0 {
                    return Err(OError::ReferencePoints(
                        "The number of partitions must be at least 1".to_string(),
                    ));
                }
            }
            NumberOfPartitions::TwoLayers(layers) => {
                if layers.boundary_layer == 0 || layers.inner_layer == 0 {
                    return Err(OError::ReferencePoints(
                        "The number of partitions in both layers must be at least 1".to_string(),
                    ));
                }
                if let Some(scaling) = layers.scaling {
                    if scaling < f64::EPSILON || scaling > 1.0 {
                        return Err(OError::ReferencePoints(
                            "The inner layer scaling factor must be larger than 0 and at most 1"
                                .to_string(),
                        ));
                    }
                }
            }
        }

        Ok(DasDarren1998 {
            number_of_objectives,
            number_of_partitions: number_of_partitions.clone(),
        })
    }

    /// Determine the number of reference points on the `self::number_of_objectives`-dimensional
    /// unit simplex. With one layer this is the binomial coefficient `C(P + M - 1, M - 1)` from
    /// Section 5.2 of the [Das & Dennis's paper](https://doi.org/10.1137/S1052623496307510).
    ///
    /// returns: `u64`. The number of reference points.
    pub fn number_of_points(&self) -> u64 {
        match &self.number_of_partitions {
            NumberOfPartitions::OneLayer(number_of_partitions) => binomial_coefficient(
                self.number_of_objectives as u64 + *number_of_partitions as u64 - 1,
                *number_of_partitions as u64,
            ),
            // inner points may coincide with boundary ones
            NumberOfPartitions::TwoLayers(_) => self.get_weights().len() as u64,
        }
    }

    /// Generate the vector of weights of reference points.
    ///
    /// return: `Vec<Vec<f64>>`. The vector of weights of size `self.number_of_points`. Each
    /// nested vector, of size equal to `self.number_of_objectives`, contains the relative
    /// coordinates (between 0 and 1) of the points for each objective.
    pub fn get_weights(&self) -> Vec<Vec<f64>> {
        match &self.number_of_partitions {
            NumberOfPartitions::OneLayer(number_of_partitions) => {
                let mut final_weights = self.layer(*number_of_partitions);
                Self::dedup_points(&mut final_weights);
                final_weights
            }
            NumberOfPartitions::TwoLayers(layers) => {
                let mut final_weights = self.layer(layers.boundary_layer);

                // shrink the inner layer towards the simplex centre and then merge it
                let scaling = layers.scaling.unwrap_or(0.5);
                let shift = (1.0 - scaling) / self.number_of_objectives as f64;
                for inner_point in self.layer(layers.inner_layer) {
                    final_weights.push(inner_point.iter().map(|v| shift + v * scaling).collect());
                }
                Self::dedup_points(&mut final_weights);
                final_weights
            }
        }
    }

    /// Generate one layer of points with `number_of_partitions` gaps.
    ///
    /// # Arguments
    ///
    /// * `number_of_partitions`: The number of gaps.
    ///
    /// returns: `Vec<Vec<f64>>`
    fn layer(&self, number_of_partitions: usize) -> Vec<Vec<f64>> {
        let mut weights: Vec<Vec<f64>> = vec![];
        let mut initial_empty_weight: Vec<usize> = vec![0; self.number_of_objectives];
        self.recursive_weights(
            &mut weights,
            &mut initial_empty_weight,
            number_of_partitions,
            number_of_partitions,
            0,
        );
        weights
    }

    /// Calculate the coordinates for each reference point or weight recursively for each objective
    /// and partition index.
    ///
    /// # Arguments
    ///
    /// * `final_weights`: The vector with the final weights.
    /// * `weight`: The vector for a weight or reference point. This must have a size equal to the
    /// number of objectives.
    /// * `left_partitions`: The number of partition left to process for the objective.
    /// * `number_of_partitions`: The number of total partitions.
    /// * `obj_index`: The objective index being process.
    fn recursive_weights(
        &self,
        final_weights: &mut Vec<Vec<f64>>,
        weight: &mut Vec<usize>,
        left_partitions: usize,
        number_of_partitions: usize,
        obj_index: usize,
    ) {
        if obj_index == self.number_of_objectives - 1 {
            // the last coordinate takes all the partitions left
            weight[obj_index] = left_partitions;
            final_weights.push(
                weight
                    .iter()
                    .map(|v| *v as f64 / number_of_partitions as f64)
                    .collect(),
            );
            return;
        }
        for k in 0..=left_partitions {
            weight[obj_index] = k;
            self.recursive_weights(
                final_weights,
                weight,
                left_partitions - k,
                number_of_partitions,
                obj_index + 1,
            )
        }
    }

    /// Remove duplicated points, keeping the first occurrence.
    ///
    /// # Arguments
    ///
    /// * `points`: The points.
    fn dedup_points(points: &mut Vec<Vec<f64>>) {
        let mut unique: Vec<Vec<f64>> = Vec::with_capacity(points.len());
        for point in points.drain(..) {
            let exists = unique.iter().any(|u| {
                u.iter()
                    .zip(&point)
                    .all(|(a, b)| (a - b).abs() < 1e-12)
            });
            if !exists {
                unique.push(point);
            }
        }
        *points = unique;
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::test_utils::assert_approx_array_eq;
    use crate::utils::reference_points::{binomial_coefficient, DasDarren1998};
    use crate::utils::{NumberOfPartitions, TwoLayerPartitions};

    #[test]
    /// Test the binomial coefficient using results from the Scipy package.
    fn test_binomial_coefficient() {
        assert_eq!(binomial_coefficient(6, 4), 15);
        assert_eq!(binomial_coefficient(1, 3), 0);
        assert_eq!(binomial_coefficient(7, 3), 35);
        assert_eq!(binomial_coefficient(100, 2), 4950);
    }

    #[test]
    /// Invalid number of objectives or partitions.
    fn test_new_errors() {
        assert!(DasDarren1998::new(0, &NumberOfPartitions::OneLayer(3)).is_err());
        assert!(DasDarren1998::new(3, &NumberOfPartitions::OneLayer(0)).is_err());
        let layers = TwoLayerPartitions {
            boundary_layer: 3,
            inner_layer: 2,
            scaling: Some(0.0),
        };
        assert!(DasDarren1998::new(3, &NumberOfPartitions::TwoLayers(layers)).is_err());
    }

    #[test]
    /// With one objective there is only one point.
    fn test_das_darren_1obj() {
        let m = DasDarren1998::new(1, &NumberOfPartitions::OneLayer(12)).unwrap();
        assert_eq!(m.number_of_points(), 1);
        assert_eq!(m.get_weights(), vec![vec![1.0]]);
    }

    #[test]
    /// Test the Das & Darren method with 3 objectives and 3 partitions.
    fn test_das_darren_3obj() {
        let m = DasDarren1998::new(3, &NumberOfPartitions::OneLayer(3)).unwrap();
        let weights = m.get_weights();
        let expected_weights = [
            [0.0, 0.0, 1.0],
            [0.0, 0.333, 0.666],
            [0.0, 0.666, 0.333],
            [0.0, 1.0, 0.0],
            [0.333, 0.0, 0.666],
            [0.333, 0.333, 0.333],
            [0.333, 0.666, 0.0],
            [0.666, 0.0, 0.333],
            [0.666, 0.333, 0.0],
            [1.0, 0.0, 0.0],
        ];
        assert_eq!(weights.len() as u64, m.number_of_points());
        assert_eq!(expected_weights.len(), weights.len());

        for (wi, exp_weight_coordinates) in expected_weights.iter().enumerate() {
            assert_approx_array_eq(&weights[wi], exp_weight_coordinates, Some(0.001));
        }
    }

    #[test]
    /// The set size matches C(P + M - 1, M - 1), all points sum to 1 and are unique.
    fn test_das_darren_simplex() {
        for (m, p, expected) in [(2, 12, 13), (3, 12, 91), (4, 5, 56), (5, 4, 70)] {
            let dd = DasDarren1998::new(m, &NumberOfPartitions::OneLayer(p)).unwrap();
            let weights = dd.get_weights();
            assert_eq!(weights.len(), expected);
            assert_eq!(dd.number_of_points(), expected as u64);

            for (i, w) in weights.iter().enumerate() {
                assert_eq!(w.len(), m);
                assert_approx_eq!(f64, w.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
                assert!(w.iter().all(|v| (0.0..=1.0).contains(v)));
                assert!(weights[i + 1..].iter().all(|o| o != w));
            }

            // corners are included
            for axis in 0..m {
                let mut corner = vec![0.0; m];
                corner[axis] = 1.0;
                assert!(weights.contains(&corner));
            }
        }
    }

    #[test]
    /// test the two layers
    fn test_das_darren_two_layers() {
        let layers = TwoLayerPartitions {
            boundary_layer: 4,
            inner_layer: 3,
            scaling: Some(0.5),
        };
        let m = DasDarren1998::new(3, &NumberOfPartitions::TwoLayers(layers)).unwrap();
        let weights = m.get_weights();
        let expected_weights = [
            [0., 0., 1.],
            [0., 0.25, 0.75],
            [0., 0.5, 0.5],
            [0., 0.75, 0.25],
            [0., 1., 0.],
            [0.25, 0., 0.75],
            [0.25, 0.25, 0.5],
            [0.25, 0.5, 0.25],
            [0.25, 0.75, 0.],
            [0.5, 0., 0.5],
            [0.5, 0.25, 0.25],
            [0.5, 0.5, 0.],
            [0.75, 0., 0.25],
            [0.75, 0.25, 0.],
            [1., 0., 0.],
            [0.16666667, 0.16666667, 0.66666667],
            [0.16666667, 0.33333333, 0.5],
            [0.16666667, 0.5, 0.33333333],
            [0.16666667, 0.66666667, 0.16666667],
            [0.33333333, 0.16666667, 0.5],
            [0.33333333, 0.33333333, 0.33333333],
            [0.33333333, 0.5, 0.16666667],
            [0.5, 0.16666667, 0.33333333],
            [0.5, 0.33333333, 0.16666667],
            [0.66666667, 0.16666667, 0.16666667],
        ];
        assert_eq!(weights.len() as u64, m.number_of_points());
        assert_eq!(expected_weights.len(), weights.len());

        for (wi, exp_weight_coordinates) in expected_weights.iter().enumerate() {
            assert_approx_array_eq(&weights[wi], exp_weight_coordinates, Some(0.0001));
        }
    }

    #[test]
    /// The simplex centre appears in both layers and is kept once.
    fn test_das_darren_two_layers_duplicates() {
        let layers = TwoLayerPartitions {
            boundary_layer: 3,
            inner_layer: 3,
            scaling: None,
        };
        let m = DasDarren1998::new(3, &NumberOfPartitions::TwoLayers(layers)).unwrap();
        let weights = m.get_weights();
        assert_eq!(weights.len(), 19);
        for w in &weights {
            assert_approx_eq!(f64, w.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        }
    }
}
