use log::debug;

use crate::core::OError;
use crate::utils::perpendicular_distance;

/// The reference point an objective vector is associated with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Association {
    /// The index of the reference point.
    pub(crate) reference_point_index: usize,
    /// The perpendicular distance between the vector and the reference direction.
    pub(crate) distance: f64,
}

/// This implements "Algorithm 3" in the NSGA-III paper which associates each normalised
/// objective vector to the closest reference direction.
pub(crate) struct AssociateToRefPoint<'a> {
    /// The normalised objectives.
    normalised_objectives: &'a [Vec<f64>],
    /// The reference points.
    reference_points: &'a [Vec<f64>],
}

impl<'a> AssociateToRefPoint<'a> {
    /// Build the [`AssociateToRefPoint`] structure. This returns an error if the reference point
    /// coordinates are not between 0 and 1.
    ///
    /// # Arguments
    ///
    /// * `normalised_objectives`: The normalised objective vectors.
    /// * `reference_points`: The reference points to associate the objectives to.
    ///
    /// returns: `Result<Self, OError>`
    pub fn new(
        normalised_objectives: &'a [Vec<f64>],
        reference_points: &'a [Vec<f64>],
    ) -> Result<Self, OError> {
        if reference_points.is_empty() {
            return Err(OError::AlgorithmRun(
                "NSGA3-AssociateToRefPoint".to_string(),
                "At least one reference point is needed".to_string(),
            ));
        }
        for point in reference_points {
            check_bounds(point)?;
        }

        Ok(Self {
            normalised_objectives,
            reference_points,
        })
    }

    /// Associate each objective vector to the reference point with the minimum perpendicular
    /// distance. When two reference points are equally distant, the one with the lower index is
    /// used.
    ///
    /// return `Result<Vec<Association>, OError>`: one association for each objective vector.
    pub fn calculate(&self) -> Result<Vec<Association>, OError> {
        self.normalised_objectives
            .iter()
            .map(|obj_values| {
                let mut best = Association {
                    reference_point_index: 0,
                    distance: f64::INFINITY,
                };
                for (ri, ref_point) in self.reference_points.iter().enumerate() {
                    let d = perpendicular_distance(ref_point, obj_values).map_err(|e| {
                        OError::AlgorithmRun(
                            "NSGA3-AssociateToRefPoint".to_string(),
                            format!("Cannot calculate vector distance because: {}", e),
                        )
                    })?;
                    if d < best.distance {
                        best = Association {
                            reference_point_index: ri,
                            distance: d,
                        };
                    }
                }
                debug!(
                    "Associated objective point {:?} to reference point #{} {:?} - distance = {}",
                    obj_values,
                    best.reference_point_index,
                    self.reference_points[best.reference_point_index],
                    best.distance
                );
                Ok(best)
            })
            .collect()
    }
}

/// Check that the values in a reference point are between 0 and 1 (i.e. all the values have
/// been normalised).
///
/// # Arguments
///
/// * `points`: The reference point coordinates to check.
///
/// returns: `Result<(), OError>`
pub(crate) fn check_bounds(points: &[f64]) -> Result<(), OError> {
    if points.iter().any(|v| !(0.0..=1.0).contains(v)) {
        return Err(OError::AlgorithmRun(
            "NSGA3-AssociateToRefPoint".to_string(),
            format!(
                "The values of the reference point {:?} must be between 0 and 1",
                points,
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::algorithms::nsga3::associate::AssociateToRefPoint;
    use crate::utils::{DasDarren1998, NumberOfPartitions};

    #[test]
    /// Test `AssociateToRefPoint` that calculates the correct distances and reference point
    /// association.
    fn test_simple_association() {
        let das_darren = DasDarren1998::new(3, &NumberOfPartitions::OneLayer(4)).unwrap();
        let ref_points = das_darren.get_weights();

        let objectives = vec![vec![0.95, 0.15, 0.15], vec![0.1, 0.9, 0.1]];
        let a = AssociateToRefPoint::new(&objectives, &ref_points)
            .unwrap()
            .calculate()
            .unwrap();

        // closest to [1, 0, 0]
        assert_eq!(ref_points[a[0].reference_point_index], vec![1.0, 0.0, 0.0]);
        assert_approx_eq!(f64, a[0].distance, 0.212132034, epsilon = 0.00001);
        assert_eq!(ref_points[a[1].reference_point_index], vec![0.0, 1.0, 0.0]);
        assert_approx_eq!(f64, a[1].distance, 0.141421356, epsilon = 0.00001);
    }

    #[test]
    /// A vector at the same distance from two points goes to the first one.
    fn test_tie_break() {
        let ref_points = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let objectives = vec![vec![0.5, 0.5], vec![0.0, 0.0]];
        let a = AssociateToRefPoint::new(&objectives, &ref_points)
            .unwrap()
            .calculate()
            .unwrap();
        assert_eq!(a[0].reference_point_index, 0);
        assert_eq!(a[1].reference_point_index, 0);
        assert_eq!(a[1].distance, 0.0);
    }

    #[test]
    fn test_reference_point_bounds() {
        let objectives = vec![vec![0.5, 0.5]];
        let ref_points = vec![vec![1.5, 0.0]];
        assert!(AssociateToRefPoint::new(&objectives, &ref_points).is_err());
        assert!(AssociateToRefPoint::new(&objectives, &[]).is_err());
    }
}
