//! # automata
//!
//! A finite automaton engine over an arbitrary ordered alphabet.
//!
//! This library provides functionality to:
//! - Build NFAs with epsilon edges by inserting states and edges by hand
//! - Eliminate epsilon edges
//! - Convert NFAs to DFAs using Subset Construction
//! - Run input sequences against the automaton to decide acceptance
//! - Export the automaton as a Graphviz graph

pub mod automaton;
pub mod dfa;
pub mod epsilon;
pub mod fa;
pub mod traversal;
pub mod visualizer;

// Re-export commonly used items for convenience
pub use automaton::{Automaton, State};
pub use fa::{AutomatonError, StateId, Symbol, FA};
pub use traversal::Traversal;
pub use visualizer::{save_dot, to_dot};
