pub use algebra::{
    dot_product, perpendicular_distance, solve_linear_system, vector_magnitude,
    LinearSolverTolerance,
};
pub use fast_non_dominated_sort::{dominates, fast_non_dominated_sort, NonDominatedSortResults};
pub use reference_points::{DasDarren1998, NumberOfPartitions, TwoLayerPartitions};
pub use vectors::{all_close, vector_max, vector_mean, vector_min, vector_std};

mod algebra;
mod fast_non_dominated_sort;
mod reference_points;
mod vectors;
