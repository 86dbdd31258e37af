//! Rotor blade design with a reference-point based multi-objective genetic algorithm.
//!
//! The crate evolves a population of blade geometries (chord and twist distributions) with the
//! NSGA-III algorithm. Each candidate is scored by an external rotor analysis program (an
//! XROTOR-like solver) that is driven through its interactive command protocol.
//!
//! The main entry points are:
//!  - [`algorithms::NSGA3`]: the generational driver, parameterised by an
//!    [`evaluation::Evaluator`];
//!  - [`algorithms::Nsga3Selector`]: the NSGA-III environmental selection;
//!  - [`evaluation::RotorEvaluator`]: the evaluator running the external solver;
//!  - [`solver::SolverScript`] and [`solver::SolverProcess`]: the solver protocol adapter.
pub mod algorithms;
pub mod core;
pub mod evaluation;
pub mod model;
pub mod operators;
pub mod solver;
pub mod utils;
