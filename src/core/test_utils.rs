#[cfg(test)]
use float_cmp::{approx_eq, F64Margin};

#[cfg(test)]
use crate::core::Individual;

#[cfg(test)]
/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(
    calculated_values: &[f64],
    expected_values: &[f64],
    epsilon: Option<f64>,
) {
    let epsilon = epsilon.unwrap_or(0.00001);
    let margins = F64Margin {
        epsilon,
        ulps: (f64::EPSILON * 2.0) as i64,
    };
    assert_eq!(
        calculated_values.len(),
        expected_values.len(),
        "the arrays have a different size"
    );
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// Create evaluated individuals from a list of objective vectors. The genes of the individual at
/// position `i` are set to `[i]` so that individuals can be told apart after selection.
///
/// # Arguments
///
/// * `objective_values`: The objective values to set on the individuals. A number of individuals
/// equal to this vector size will be created.
///
/// returns: `Vec<Individual>`
#[cfg(test)]
pub(crate) fn individuals_from_obj_values(objective_values: &[Vec<f64>]) -> Vec<Individual> {
    objective_values
        .iter()
        .enumerate()
        .map(|(i, o)| Individual::with_fitness(vec![i as f64], o.clone()).unwrap())
        .collect()
}
