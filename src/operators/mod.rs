pub use crossover::{
    Crossover, CrossoverChildren, SimulatedBinaryCrossover, SimulatedBinaryCrossoverArgs,
};
pub use mutation::{Mutation, PolynomialMutation, PolynomialMutationArgs};

mod crossover;
mod mutation;
