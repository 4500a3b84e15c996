//! Genetic operators: pure transformations over fitness
//! scores and chromosomes that produce the next generation's
//! chromosome pool.
//!
//! Every operator validates its arguments before drawing
//! any random numbers, so a malformed call fails the same
//! way regardless of the generator's state.
mod crossover;
mod mutation;
mod selection;

pub use crossover::{crossover, CrossoverScheme};
pub use mutation::mutate;
pub use selection::{select, SelectionScheme};
