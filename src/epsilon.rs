/* Epsilon closure and epsilon edge elimination. Every state inherits the real edges and the
 * terminal flag of the states it reaches over epsilon edges, after which the epsilon edges are
 * dropped. */

use bitvec::prelude::*;
use log::debug;

use crate::automaton::Automaton;
use crate::fa::{AutomatonError, StateId, Symbol};

impl<T: Symbol> Automaton<T> {
    /// States reachable from `id` over one or more epsilon edges, in ascending order. The state
    /// itself is not part of its closure, even when an epsilon cycle leads back to it.
    pub fn epsilon_closure(&self, id: StateId) -> Result<Vec<StateId>, AutomatonError> {
        let id = self.resolve(id)?;
        Ok(self.closure_of(id).iter_ones().collect())
    }

    pub(crate) fn closure_of(&self, state_id: StateId) -> BitVec<u8> {
        let mut closure: BitVec<u8, Lsb0> = BitVec::repeat(false, self.states.len());
        let mut stack = vec![state_id];

        while let Some(state) = stack.pop() {
            for &target in self.targets(state, self.epsilon) {
                if !closure[target] {
                    closure.set(target, true);
                    stack.push(target);
                }
            }
        }

        closure.set(state_id, false);
        closure
    }

    /// Rewrite the automaton so that it has no epsilon edges but accepts the same language.
    /// Running it on an automaton without epsilon edges changes nothing.
    pub fn eliminate_epsilons(&mut self) {
        let epsilon = self.epsilon;
        if !self.alphabet.contains(&epsilon) {
            return;
        }

        let mut copied_edges = Vec::new();
        let mut new_terminals = Vec::new();

        for state_id in 0..self.states.len() {
            let closure = self.closure_of(state_id);

            for member in closure.iter_ones() {
                if self.accept_states[member] && !self.accept_states[state_id] {
                    new_terminals.push(state_id);
                }
                for (&symbol, targets) in self.states[member].get_transitions() {
                    if symbol == epsilon {
                        continue;
                    }
                    for &target in targets {
                        copied_edges.push((state_id, symbol, target));
                    }
                }
            }
        }

        debug!(
            "Epsilon elimination copies {} edges and marks {} states terminal",
            copied_edges.len(),
            new_terminals.len()
        );

        for (from, symbol, to) in copied_edges {
            self.insert_edge(from, symbol, to);
        }
        for state_id in new_terminals {
            self.accept_states.set(state_id, true);
        }
        self.drop_symbol(epsilon);
    }
}

#[cfg(test)]
mod epsilon_tests {
    use super::*;
    use crate::fa::FA;

    #[test]
    fn test_closure_excludes_self() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, '#', 1, false).unwrap();
        automaton.add_edge(1, '#', 2, false).unwrap();
        automaton.add_edge(2, 'a', 3, false).unwrap();

        assert_eq!(automaton.epsilon_closure(0), Ok(vec![1, 2]));
        assert_eq!(automaton.epsilon_closure(2), Ok(vec![]));
        assert_eq!(
            automaton.epsilon_closure(9),
            Err(AutomatonError::InvalidReference(9))
        );
    }

    #[test]
    fn test_closure_with_cycle() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, '#', 1, false).unwrap();
        automaton.add_edge(1, '#', 0, false).unwrap();
        automaton.add_edge(0, '#', 0, false).unwrap();

        assert_eq!(automaton.epsilon_closure(0), Ok(vec![1]));
        assert_eq!(automaton.epsilon_closure(1), Ok(vec![0]));
    }

    #[test]
    fn test_closure_of_long_chain() {
        let length = 100_000;
        let mut automaton = Automaton::with_states('#', length);
        for state in 0..length - 1 {
            automaton.add_edge(state, '#', state + 1, false).unwrap();
        }
        assert_eq!(automaton.epsilon_closure(0).unwrap().len(), length - 1);
    }

    #[test]
    fn test_elimination_copies_edges() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, '#', 1, false).unwrap();
        automaton.add_edge(1, '#', 2, false).unwrap();
        automaton.add_edge(2, 'a', 3, false).unwrap();
        automaton.add_edge(1, 'b', 0, false).unwrap();

        automaton.eliminate_epsilons();

        assert_eq!(automaton.targets(0, 'a'), &[3]);
        assert_eq!(automaton.targets(0, 'b'), &[0]);
        assert_eq!(automaton.targets(1, 'a'), &[3]);
        assert!(automaton.targets(0, '#').is_empty());
        assert!(!automaton.alphabet().contains(&'#'));
        assert!(automaton.is_deterministic());
    }

    #[test]
    fn test_elimination_merges_terminal_flags() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, 'a', 1, false).unwrap();
        automaton.add_edge(1, '#', 2, true).unwrap();

        automaton.eliminate_epsilons();

        assert_eq!(automaton.is_terminal(1), Ok(true));
        assert_eq!(automaton.is_terminal(0), Ok(false));
        let accept_states: Vec<usize> = automaton.get_acceptor_states().iter_ones().collect();
        assert_eq!(accept_states, vec![1, 2]);
    }

    #[test]
    fn test_elimination_is_idempotent() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, '#', 1, false).unwrap();
        automaton.add_edge(1, 'a', 1, true).unwrap();
        automaton.add_edge(1, '#', 0, false).unwrap();

        automaton.eliminate_epsilons();
        let once: Vec<_> = automaton.edges().collect();
        automaton.eliminate_epsilons();
        let twice: Vec<_> = automaton.edges().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_elimination_without_epsilon_edges() {
        let mut automaton = Automaton::new('#');
        automaton.add_edge(0, 'a', 1, true).unwrap();
        let before: Vec<_> = automaton.edges().collect();

        automaton.eliminate_epsilons();

        let after: Vec<_> = automaton.edges().collect();
        assert_eq!(before, after);
        assert_eq!(automaton.alphabet().len(), 1);
    }
}
