use nalgebra::{DMatrix, DVector};

use crate::core::OError;
use crate::utils::all_close;

/// The tolerances used to accept the solution of a linear system. The system `A * x = b` is
/// solved when `A * x` and `b` are close according to [`crate::utils::all_close`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearSolverTolerance {
    /// The relative tolerance.
    pub relative: f64,
    /// The absolute tolerance.
    pub absolute: f64,
}

impl Default for LinearSolverTolerance {
    fn default() -> Self {
        Self {
            relative: 1e-05,
            absolute: 1e-08,
        }
    }
}

/// Find the least-squares solution of `A * x = b` with the singular value decomposition (SVD)
/// of `A`.
///
/// # Arguments
///
/// * `a`: The rows of the coefficient matrix. All rows must have the same non-zero size.
/// * `b`: The right-hand side, with one value per row of `a`.
/// * `tolerances`: When given, the residual of the solution is checked and an error is returned
///    if `A * x` is not close to `b`.
///
/// returns: `Result<Vec<f64>, OError>`
///
/// # Examples
///
/// ```
/// use optirotor::utils::{LinearSolverTolerance, solve_linear_system};
/// let a = vec![
///     vec![1.0, 9.0, -5.0],
///     vec![-3.0, -5.0, -5.0],
///     vec![-2.0, -7.0, 1.0],
/// ];
/// let b = vec![-32.0, -10.0, 13.0];
/// let x = solve_linear_system(&a, &b, Some(LinearSolverTolerance::default())).unwrap();
/// println!("{:?}", x); // [5.0, -3.0, 2.0]
/// ```
pub fn solve_linear_system(
    a: &[Vec<f64>],
    b: &[f64],
    tolerances: Option<LinearSolverTolerance>,
) -> Result<Vec<f64>, OError> {
    let rows = a.len();
    let cols = a.first().map_or(0, |r| r.len());
    if rows == 0 || cols == 0 {
        return Err(OError::Generic(
            "The coefficient matrix of the linear system is empty".to_string(),
        ));
    }
    if a.iter().any(|r| r.len() != cols) {
        return Err(OError::Generic(
            "The rows of the coefficient matrix must have the same size".to_string(),
        ));
    }
    if b.len() != rows {
        return Err(OError::Generic(format!(
            "The linear system has {rows} equations but {} known terms",
            b.len()
        )));
    }

    let matrix = DMatrix::from_fn(rows, cols, |r, c| a[r][c]);
    let rhs = DVector::from_column_slice(b);
    let x = matrix
        .clone()
        .svd(true, true)
        .solve(&rhs, f64::EPSILON)
        .map_err(|e| OError::Generic(format!("The linear system cannot be solved: {e}")))?;

    if let Some(tol) = tolerances {
        let found = &matrix * &x;
        if !all_close(
            rhs.as_slice(),
            found.as_slice(),
            Some(tol.relative),
            Some(tol.absolute),
        ) {
            return Err(OError::Generic(
                "The solution of the linear system is outside the tolerance limits".to_string(),
            ));
        }
    }
    Ok(x.as_slice().to_vec())
}

/// Calculate the dot product between two vectors. This returns an error if the size of the
/// vectors does not match.
///
/// # Arguments
///
/// * `a`: The first vector.
/// * `b`: The second vector.
///
/// returns: `Result<f64, OError>`
pub fn dot_product(a: &[f64], b: &[f64]) -> Result<f64, OError> {
    if a.len() != b.len() {
        return Err(OError::Generic(format!(
            "Cannot multiply vectors with {} and {} items",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// The Euclidean norm of a vector.
pub fn vector_magnitude(vector: &[f64]) -> f64 {
    vector.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Calculate the distance between a `point` and the line through the origin with direction
/// `line`. This returns an error if the size of the vectors does not match or the direction
/// has zero length.
///
/// # Arguments
///
/// * `line`: The direction of the line (for example a reference point).
/// * `point`: The point coordinates.
///
/// returns: `Result<f64, OError>`
pub fn perpendicular_distance(line: &[f64], point: &[f64]) -> Result<f64, OError> {
    let norm = vector_magnitude(line);
    if norm == 0.0 {
        return Err(OError::Generic(
            "The line direction has zero length".to_string(),
        ));
    }
    // length of the projection along the unit direction
    let t = dot_product(point, line)? / norm;
    let squared: f64 = point
        .iter()
        .zip(line)
        .map(|(p, l)| (p - t * l / norm).powi(2))
        .sum();
    Ok(squared.sqrt())
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::core::test_utils::assert_approx_array_eq;
    use crate::utils::{
        dot_product, perpendicular_distance, solve_linear_system, vector_magnitude,
        LinearSolverTolerance,
    };

    #[test]
    /// Solve a square system with a unique solution.
    fn test_linear_system() {
        let a = vec![
            vec![1.0, 9.0, -5.0],
            vec![-3.0, -5.0, -5.0],
            vec![-2.0, -7.0, 1.0],
        ];
        let b = vec![-32.0, -10.0, 13.0];
        let x = solve_linear_system(&a, &b, Some(LinearSolverTolerance::default())).unwrap();
        assert_approx_array_eq(&x, &[5.0, -3.0, 2.0], None);
    }

    #[test]
    /// The plane through three extreme points has coefficients equal to the inverse of the
    /// intercepts.
    fn test_plane_through_points() {
        let points = vec![
            vec![2.0, 0.0, 0.0],
            vec![0.0, 4.0, 0.0],
            vec![0.0, 0.0, 0.5],
        ];
        let x = solve_linear_system(&points, &[1.0; 3], Some(LinearSolverTolerance::default()))
            .unwrap();
        assert_approx_array_eq(&x, &[0.5, 0.25, 2.0], None);
    }

    #[test]
    /// An over-determined system returns the least-squares fit.
    fn test_least_squares() {
        let x = vec![
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![2.0, 1.0],
            vec![3.0, 1.0],
        ];
        let y = vec![-1.0, 0.2, 0.9, 2.1];

        let fit = solve_linear_system(&x, &y, None).unwrap();
        assert_approx_eq!(f64, fit[0], 1.0, epsilon = 0.0001);
        assert_approx_eq!(f64, fit[1], -0.95, epsilon = 0.0001);

        // the residual is too large
        assert!(solve_linear_system(&x, &y, Some(LinearSolverTolerance::default())).is_err());
    }

    #[test]
    fn test_linear_system_size_errors() {
        assert!(solve_linear_system(&[], &[], None).is_err());
        assert!(solve_linear_system(&[vec![]], &[1.0], None).is_err());
        assert!(solve_linear_system(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 1.0], None).is_err());
        assert!(solve_linear_system(&[vec![1.0]], &[1.0, 1.0], None).is_err());
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]).unwrap(), 12.0);
        assert!(dot_product(&[1.0, 2.0], &[1.0]).is_err());
        assert_eq!(vector_magnitude(&[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_perpendicular_distance() {
        assert_approx_eq!(
            f64,
            perpendicular_distance(&[1.0, 1.0, 1.0], &[0.0, 0.0, 2.0]).unwrap(),
            1.632993,
            epsilon = 0.0001
        );
        // the point lies on the line
        assert_approx_eq!(
            f64,
            perpendicular_distance(&[0.5, 0.5], &[2.0, 2.0]).unwrap(),
            0.0,
            epsilon = 1e-12
        );
        // the direction length does not matter
        assert_approx_eq!(
            f64,
            perpendicular_distance(&[0.0, 3.0], &[1.0, 5.0]).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert!(perpendicular_distance(&[0.0, 0.0], &[1.0, 1.0]).is_err());
    }
}
