use bitvec::prelude::BitVec;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

/// Dense, zero-based identifier of a state inside one automaton.
pub type StateId = usize;

/// Anything that can label an edge. The alphabet has to be totally ordered so that edges of a
/// state can be looked up in symbol order.
pub trait Symbol: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

impl<T> Symbol for T where T: Copy + Ord + Hash + fmt::Debug + fmt::Display {}

pub trait FA {
    type Symbol: Symbol;

    fn get_num_states(&self) -> usize;
    fn get_start_state(&self) -> StateId;
    fn get_alphabet(&self) -> &BTreeSet<Self::Symbol>;
    fn get_acceptor_states(&self) -> &BitVec<u8>;
    fn get_epsilon(&self) -> Self::Symbol;
    fn get_state_transitions(&self, state_id: StateId) -> Vec<(Self::Symbol, StateId)>;
}

/// List of possible errors while building an automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// The id is neither an allocated state nor a registered alias
    InvalidReference(StateId),
    /// An edge was added from a source state which has not been created yet
    UndeclaredSource(StateId),
}

impl fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::InvalidReference(id) => {
                write!(f, "Error: State {} does not exist in the automaton!", id)
            }
            AutomatonError::UndeclaredSource(id) => {
                write!(f, "Error: Add state {} before adding edges from it!", id)
            }
        }
    }
}

impl std::error::Error for AutomatonError {}
