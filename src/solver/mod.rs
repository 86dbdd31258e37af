//! Adapter for the external rotor analysis solver. The solver is an interactive program that
//! reads commands from its standard input and writes the analysis results to a file.
pub use error::SolverError;
pub use process::{SolverOutput, SolverProcess};
pub use result_table::{ResultColumn, ResultTable, ResultTableLayout};
pub use script::{SolverCommand, SolverScript};

mod error;
mod process;
mod result_table;
mod script;
