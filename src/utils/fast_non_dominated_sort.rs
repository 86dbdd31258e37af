use crate::core::OError;

/// Outputs of the non-dominated sort algorithm.
#[derive(Debug)]
pub struct NonDominatedSortResults {
    /// A vector containing sub-vectors. Each child vector represents a front (with the first being
    /// the primary non-dominated front with solutions of rank 1); each child vector contains
    /// the indexes of the objective vectors passed to [`fast_non_dominated_sort`] belonging to that
    /// front. Indexes in a front are in ascending order.
    pub front_indexes: Vec<Vec<usize>>,
    /// Number of solutions that dominates a solution at a given vector index. When the counter
    /// is 0, the solution is non-dominated. This is `n_p` in the paper.
    pub domination_counter: Vec<usize>,
}

/// Check whether the objective vector `a` Pareto-dominates `b`. All objectives are minimised:
/// `a` dominates `b` if it is no worse in all objectives and strictly better in at least one.
///
/// # Arguments
///
/// * `a`: The first objective vector.
/// * `b`: The second objective vector.
///
/// returns: `bool`
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (va, vb) in a.iter().zip(b) {
        if va > vb {
            return false;
        }
        if va < vb {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Non-dominated fast sorting from NSGA2 paper (with complexity $O(M * N^2)$, where `M` is the
/// number of objectives and `N` the number of solutions).
///
/// This sorts the objective vectors into fronts. Solutions that are not dominated by any other
/// solution belong to the first front. All objectives are minimised.
///
/// Implemented based on paragraph 3A in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `objectives`: The objective vectors to sort by dominance. All vectors must have the same size.
///
/// returns: `Result<NonDominatedSortResults, OError>`.
pub fn fast_non_dominated_sort(objectives: &[Vec<f64>]) -> Result<NonDominatedSortResults, OError> {
    if let Some(first) = objectives.first() {
        if objectives.iter().any(|o| o.len() != first.len()) {
            return Err(OError::SurvivalOperator(
                "fast non-dominated sort".to_string(),
                "All the objective vectors must have the same size".to_string(),
            ));
        }
    }

    // this set contains all the solutions being dominated by a solution `p`. This is `S_p` in
    // the paper
    let mut dominated_solutions: Vec<Vec<usize>> = vec![Vec::new(); objectives.len()];
    // number of solutions that dominates `p`. When the counter is 0, `p` is non-dominated.
    let mut domination_counter: Vec<usize> = vec![0; objectives.len()];

    for pi in 0..objectives.len() {
        for qi in (pi + 1)..objectives.len() {
            if dominates(&objectives[pi], &objectives[qi]) {
                dominated_solutions[pi].push(qi);
                domination_counter[qi] += 1;
            } else if dominates(&objectives[qi], &objectives[pi]) {
                dominated_solutions[qi].push(pi);
                domination_counter[pi] += 1;
            }
        }
    }

    // the solutions non-dominated by any other belong to the first front
    let mut current_front: Vec<usize> = (0..objectives.len())
        .filter(|i| domination_counter[*i] == 0)
        .collect();
    let e_domination_counter = domination_counter.clone();

    let mut all_fronts: Vec<Vec<usize>> = Vec::new();
    while !current_front.is_empty() {
        let mut next_front: Vec<usize> = Vec::new();
        for pi in current_front.iter() {
            for qi in dominated_solutions[*pi].iter() {
                domination_counter[*qi] -= 1;

                // none of the solutions in the subsequent fronts dominates `q`
                if domination_counter[*qi] == 0 {
                    next_front.push(*qi);
                }
            }
        }
        next_front.sort_unstable();
        all_fronts.push(current_front);
        current_front = next_front;
    }

    Ok(NonDominatedSortResults {
        front_indexes: all_fronts,
        domination_counter: e_domination_counter,
    })
}

#[cfg(test)]
mod test {
    use crate::utils::fast_non_dominated_sort;
    use crate::utils::fast_non_dominated_sort::dominates;

    #[test]
    fn test_dominates() {
        assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
        assert!(!dominates(&[1.0, 3.0], &[1.0, 3.0]));
        assert!(!dominates(&[0.0, 4.0], &[1.0, 3.0]));
    }

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_2obj() {
        let objectives = vec![
            vec![1.1, 8.1],
            vec![2.1, 6.1],
            vec![3.1, 4.1],
            vec![3.1, 7.1],
            vec![5.1, 3.1],
            vec![5.1, 5.1],
            vec![7.1, 7.1],
            vec![8.1, 2.1],
            vec![10.1, 6.1],
            vec![11.1, 1.1],
            vec![11.1, 3.1],
        ];
        let result = fast_non_dominated_sort(&objectives).unwrap();

        let expected_first = vec![0, 1, 2, 4, 7, 9];
        assert_eq!(result.front_indexes[0], expected_first);
        assert_eq!(result.front_indexes[1], vec![3, 5, 10]);
        assert_eq!(result.front_indexes[2], vec![6, 8]);
        assert_eq!(result.front_indexes.len(), 3);

        // check counter for some solutions
        for idx in expected_first {
            assert_eq!(result.domination_counter[idx], 0);
        }
        // by 2 and 4
        assert_eq!(result.domination_counter[5], 2);
        // by 1, 2, 4, 5 and 7
        assert_eq!(result.domination_counter[8], 5);
        // by 1 and 2
        assert_eq!(result.domination_counter[3], 2);
    }

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated by
    /// plotting the objective values.
    fn test_sorting_3obj() {
        let objectives = vec![
            vec![2.1, 3.1, 4.1],
            vec![-1.1, 4.1, 8.1],
            vec![0.1, -1.1, -2.1],
            vec![0.1, 0.1, 0.1],
        ];
        let result = fast_non_dominated_sort(&objectives).unwrap();

        assert_eq!(result.front_indexes, vec![vec![1, 2], vec![3], vec![0]]);
        assert_eq!(result.domination_counter[0], 2);
        assert_eq!(result.domination_counter[3], 1);
    }

    #[test]
    /// Identical vectors do not dominate each other and share the front.
    fn test_sorting_duplicates() {
        let objectives = vec![vec![0.1], vec![0.05], vec![0.05], vec![0.3]];
        let result = fast_non_dominated_sort(&objectives).unwrap();
        assert_eq!(result.front_indexes, vec![vec![1, 2], vec![0], vec![3]]);
    }

    #[test]
    /// Empty and single inputs.
    fn test_sorting_small_inputs() {
        assert!(fast_non_dominated_sort(&[])
            .unwrap()
            .front_indexes
            .is_empty());
        assert_eq!(
            fast_non_dominated_sort(&[vec![1.0, 2.0]])
                .unwrap()
                .front_indexes,
            vec![vec![0]]
        );
        assert!(fast_non_dominated_sort(&[vec![1.0, 2.0], vec![1.0]]).is_err());
    }
}
