use crate::core::OError;

/// Calculate the vector minimum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_min(v: &[f64]) -> Result<f64, OError> {
    Ok(*v
        .iter()
        .min_by(|a, b| a.total_cmp(b))
        .ok_or(OError::Generic(
            "Cannot calculate vector min value".to_string(),
        ))?)
}

/// Calculate the vector maximum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_max(v: &[f64]) -> Result<f64, OError> {
    Ok(*v
        .iter()
        .max_by(|a, b| a.total_cmp(b))
        .ok_or(OError::Generic(
            "Cannot calculate vector max value".to_string(),
        ))?)
}

/// Calculate the mean of a vector.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_mean(v: &[f64]) -> Result<f64, OError> {
    if v.is_empty() {
        return Err(OError::Generic(
            "Cannot calculate the mean of an empty vector".to_string(),
        ));
    }
    Ok(v.iter().sum::<f64>() / v.len() as f64)
}

/// Calculate the population standard deviation of a vector (with `N` degrees of freedom).
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, OError>`
pub fn vector_std(v: &[f64]) -> Result<f64, OError> {
    let mean = vector_mean(v)?;
    let variance = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / v.len() as f64;
    Ok(variance.sqrt())
}

/// Returns `true` if two arrays are element-wise equal within a tolerance. This behaves as the
///numpy implementation at <https://numpy.org/doc/stable/reference/generated/numpy.allclose.html>.
///
/// # Arguments
///
/// * `a`: First vector to compare.
/// * `b`: Second vector to compare.
/// * `r_tol`: The relative tolerance parameter
/// * `a_tol`: The absolute tolerance parameter
///
/// returns: `bool`
pub fn all_close(a: &[f64], b: &[f64], r_tol: Option<f64>, a_tol: Option<f64>) -> bool {
    let r_tol = r_tol.unwrap_or(1e-05);
    let a_tol = a_tol.unwrap_or(1e-08);

    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(v1, v2)| (v1 - v2).abs() <= (a_tol + r_tol * v2.abs()))
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::utils::{all_close, vector_max, vector_mean, vector_min, vector_std};

    #[test]
    fn test_min_max() {
        let v = vec![99.0, 11.0, 456.2, -19.0, 0.5];
        assert_eq!(vector_min(&v).unwrap(), -19.0);
        assert_eq!(vector_max(&v).unwrap(), 456.2);
        assert!(vector_min(&[]).is_err());
    }

    #[test]
    /// Compare against numpy `mean` and `std` (ddof=0).
    fn test_mean_std() {
        let v = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx_eq!(f64, vector_mean(&v).unwrap(), 5.0);
        assert_approx_eq!(f64, vector_std(&v).unwrap(), 2.0);
        assert_approx_eq!(f64, vector_std(&[3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_all_close() {
        assert!(all_close(&[1.0, 2.0], &[1.0, 2.0 + 1e-9], None, None));
        assert!(!all_close(&[1.0, 2.0], &[1.0, 2.1], None, None));
        assert!(!all_close(&[1.0], &[1.0, 2.0], None, None));
    }
}
