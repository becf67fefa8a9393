/* Running input through an automaton. The cursor is a separate value which borrows the automaton,
 * so any number of traversals can read the same automaton at the same time. */

use log::trace;

use crate::automaton::Automaton;
use crate::fa::{StateId, Symbol};

/// A cursor over an automaton. Traversal results are only meaningful on a deterministic
/// automaton; on an NFA the first edge for a symbol is taken.
#[derive(Debug, Clone)]
pub struct Traversal<'a, T> {
    automaton: &'a Automaton<T>,
    current: StateId,
    rejected: bool,
}

impl<'a, T: Symbol> Traversal<'a, T> {
    pub fn new(automaton: &'a Automaton<T>) -> Self {
        Traversal {
            automaton,
            current: automaton.initial_state_id(),
            rejected: false,
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// True once a symbol had no matching edge. The cursor stays where it was until the next
    /// reset.
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    pub fn is_accepting(&self) -> bool {
        !self.rejected && self.automaton.accept_states[self.current]
    }

    pub fn reset(&mut self) {
        self.current = self.automaton.initial_state_id();
        self.rejected = false;
    }

    /// Follow the edge labelled `symbol` from the current state and return whether the new state
    /// is terminal. Returns `None` without moving when there is no such edge, or when an earlier
    /// symbol was already rejected.
    pub fn step(&mut self, symbol: T) -> Option<bool> {
        if self.rejected {
            return None;
        }

        match self.automaton.targets(self.current, symbol).first() {
            Some(&next) => {
                self.current = next;
                Some(self.automaton.accept_states[next])
            }
            None => {
                trace!("No edge for {} from state {}", symbol, self.current);
                self.rejected = true;
                None
            }
        }
    }

    /// Read a whole sequence from the initial state and report whether it ends in a terminal
    /// state. The cursor is back at the initial state afterwards.
    pub fn read<I>(&mut self, input: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.reset();
        for symbol in input {
            self.step(symbol);
        }
        let accepted = self.is_accepting();
        self.reset();
        accepted
    }
}

impl<T: Symbol> Automaton<T> {
    /// Start a traversal at the initial state.
    pub fn start(&self) -> Traversal<'_, T> {
        Traversal::new(self)
    }

    pub fn accepts<I>(&self, input: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        self.start().read(input)
    }
}

impl Automaton<char> {
    pub fn read_string(&self, word: &str) -> bool {
        self.accepts(word.chars())
    }
}
