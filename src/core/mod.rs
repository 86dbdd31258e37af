pub use config::read_json_config;
pub use error::OError;
pub use gene_space::GeneSpace;
pub use individual::{Fitness, Individual, Individuals, Population};

mod config;
mod error;
mod gene_space;
mod individual;
pub(crate) mod test_utils;
pub(crate) mod utils;
