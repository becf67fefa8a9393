/* Perform subset construction to convert an NFA into a DFA. Epsilon edges are eliminated first,
 * then every reachable set of NFA states becomes one DFA state. */

use bitvec::prelude::*;
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::automaton::Automaton;
use crate::fa::{StateId, Symbol};

/// A bitvec of NFA states stored together with its hash. The hash only speeds up lookups, two
/// sets are the same DFA state only when their bits are equal.
#[derive(Clone, Debug)]
struct HashedBitVec {
    bv: BitVec<u8>,
    hash: u64,
}

impl HashedBitVec {
    fn new(bv: BitVec<u8>) -> Self {
        let mut hasher = DefaultHasher::new();
        bv.hash(&mut hasher);
        let hash = hasher.finish();
        Self { bv, hash }
    }
}

impl Hash for HashedBitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for HashedBitVec {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bv == other.bv
    }
}

impl Eq for HashedBitVec {}

// This function returns the set of states reachable via symbol c from the states in q

fn delta<T: Symbol>(nfa: &Automaton<T>, q: &HashedBitVec, c: T) -> BitVec<u8> {
    let mut result = BitVec::repeat(false, q.bv.len());
    for node in q.bv.iter_ones() {
        for &state_id in nfa.targets(node, c) {
            result.set(state_id, true);
        }
    }
    result
}

fn has_accepting<T: Symbol>(nfa: &Automaton<T>, nfa_states: &BitVec<u8>) -> bool {
    nfa_states
        .iter_ones()
        .any(|state_id| nfa.accept_states[state_id])
}

// A single NFA state without outgoing edges cannot lead anywhere

fn is_dead_end<T: Symbol>(nfa: &Automaton<T>, q: &HashedBitVec) -> bool {
    q.bv.count_ones() == 1
        && q.bv
            .first_one()
            .is_some_and(|state_id| !nfa.states[state_id].has_transitions())
}

/// Apply the subset construction algorithm on an epsilon free NFA. The DFA alphabet holds the
/// symbols its edges carry.
fn construct_dfa<T: Symbol>(nfa: &Automaton<T>) -> Automaton<T> {
    let mut result = Automaton::new(nfa.epsilon);
    let alphabet: Vec<T> = nfa
        .alphabet
        .iter()
        .copied()
        .filter(|&c| c != nfa.epsilon)
        .collect();

    let mut q_list: HashMap<HashedBitVec, StateId> = HashMap::new(); // Mapping from nfa state set to DFA state
    let mut work_list = VecDeque::new();

    let mut nfa_states = BitVec::repeat(false, nfa.states.len());
    nfa_states.set(nfa.start_state, true);
    let q0 = HashedBitVec::new(nfa_states);

    let d0 = result.start_state;
    result.accept_states.set(d0, has_accepting(nfa, &q0.bv));
    q_list.insert(q0.clone(), d0);
    work_list.push_back((d0, q0));

    while let Some((dq, q)) = work_list.pop_front() {
        if is_dead_end(nfa, &q) {
            continue;
        }

        for &c in alphabet.iter() {
            let end_states = delta(nfa, &q, c);
            if end_states.not_any() {
                continue;
            }

            let t = HashedBitVec::new(end_states);

            let dt = if let Some(&existing) = q_list.get(&t) {
                existing
            } else {
                let dt = result.add_state(has_accepting(nfa, &t.bv));
                trace!(
                    "DFA state {} stands for NFA states {:?}",
                    dt,
                    t.bv.iter_ones().collect::<Vec<_>>()
                );
                q_list.insert(t.clone(), dt);
                work_list.push_back((dt, t));
                dt
            };

            result.insert_edge(dq, c, dt);
        }
    }

    result
}

impl<T: Symbol> Automaton<T> {
    /// Replace the automaton by an equivalent DFA. Epsilon edges are eliminated first, the new
    /// initial state is 0.
    pub fn determinize(&mut self) {
        self.eliminate_epsilons();

        let dfa = construct_dfa(self);
        debug!(
            "Subset construction built {} DFA states from {} NFA states",
            dfa.states.len(),
            self.states.len()
        );

        *self = dfa;
    }
}

#[cfg(test)]
mod dfa_tests {
    use super::*;
    use crate::fa::FA;
    use std::collections::BTreeSet;

    fn bits(len: usize, ones: &[usize]) -> BitVec<u8> {
        let mut bv = BitVec::repeat(false, len);
        for &one in ones {
            bv.set(one, true);
        }
        bv
    }

    #[test]
    fn test_hashed_bitvec_needs_equal_bits() {
        let a = HashedBitVec::new(bits(4, &[0, 2]));
        let b = HashedBitVec::new(bits(4, &[0, 2]));
        assert_eq!(a, b);

        // Same digest, different members
        let forged = HashedBitVec {
            bv: bits(4, &[1, 3]),
            hash: a.hash,
        };
        assert_ne!(a, forged);

        let mut q_list = HashMap::new();
        q_list.insert(a, 0);
        q_list.insert(forged, 1);
        assert_eq!(q_list.len(), 2);
    }

    #[test]
    fn test_delta() {
        let mut nfa = Automaton::new('#');
        nfa.add_edge(0, 'a', 1, false).unwrap();
        nfa.add_edge(0, 'a', 2, false).unwrap();
        nfa.add_edge(1, 'a', 3, false).unwrap();
        nfa.add_edge(2, 'b', 3, false).unwrap();

        let q = HashedBitVec::new(bits(4, &[0, 1]));
        assert_eq!(delta(&nfa, &q, 'a'), bits(4, &[1, 2, 3]));
        assert!(delta(&nfa, &q, 'b').not_any());
    }

    #[test]
    fn test_construct_dfa_three_loops() {
        let mut nfa = Automaton::new('#');
        for i in 1..=3u8 {
            nfa.add_edge(0, 'a', i as usize, true).unwrap();
            nfa.add_edge(i as usize, (b'a' + i - 1) as char, i as usize, true)
                .unwrap();
        }

        let dfa = construct_dfa(&nfa);

        // {0} -a-> {1, 2, 3}, which splits into {1}, {2} and {3}
        assert_eq!(dfa.get_num_states(), 5);
        let edges: Vec<_> = dfa.edges().collect();
        assert_eq!(
            edges,
            vec![
                (0, 'a', 1),
                (1, 'a', 2),
                (1, 'b', 3),
                (1, 'c', 4),
                (2, 'a', 2),
                (3, 'b', 3),
                (4, 'c', 4),
            ]
        );

        assert!(!dfa.is_terminal(0).unwrap());
        for state in 1..5 {
            assert!(dfa.is_terminal(state).unwrap());
        }
        assert!(dfa.is_deterministic());
    }

    #[test]
    fn test_dead_end_subset_has_no_edges() {
        let mut nfa = Automaton::new('#');
        nfa.add_edge(0, 'a', 1, true).unwrap();
        nfa.add_edge(0, 'b', 0, false).unwrap();

        let dfa = construct_dfa(&nfa);

        assert_eq!(dfa.get_num_states(), 2);
        assert_eq!(dfa.targets(0, 'a'), &[1]);
        assert_eq!(dfa.targets(0, 'b'), &[0]);
        assert!(!dfa.get_state(1).unwrap().has_transitions());
        assert!(dfa.is_terminal(1).unwrap());
    }

    #[test]
    fn test_alphabet_holds_only_used_symbols() {
        let mut nfa = Automaton::new('#');
        nfa.add_edge(0, 'a', 1, true).unwrap();
        let unreachable = nfa.add_state(false);
        nfa.add_edge(unreachable, 'b', 0, false).unwrap();

        nfa.determinize();

        let used: BTreeSet<char> = nfa.edges().map(|(_, symbol, _)| symbol).collect();
        assert_eq!(nfa.alphabet(), &used);
        assert!(!nfa.alphabet().contains(&'b'));

        nfa.add_edge(1, 'c', 0, false).unwrap();
        assert_eq!(nfa.alphabet().iter().copied().collect::<Vec<_>>(), vec!['a', 'c']);
    }

    #[test]
    fn test_terminal_initial_state_is_kept() {
        let mut nfa = Automaton::new('#');
        nfa.add_edge(0, '#', 0, true).unwrap();
        nfa.add_edge(0, 'a', 0, false).unwrap();

        nfa.determinize();

        assert_eq!(nfa.get_num_states(), 1);
        assert!(nfa.is_terminal(0).unwrap());
        assert_eq!(nfa.targets(0, 'a'), &[0]);
    }

    #[test]
    fn test_determinize_replaces_graph() {
        let mut nfa = Automaton::new('#');
        nfa.add_edge(0, 'a', 0, false).unwrap();
        nfa.add_edge(0, 'a', 1, false).unwrap();
        nfa.add_edge(0, '#', 2, false).unwrap();
        nfa.add_edge(2, 'b', 3, true).unwrap();

        nfa.determinize();

        assert!(nfa.is_deterministic());
        assert_eq!(nfa.initial_state_id(), 0);
        assert!(!nfa.alphabet().contains(&'#'));
        assert!(nfa.aliases.is_empty());
        // {0} -a-> {0, 1} and {0} -b-> {3}
        assert_eq!(nfa.get_num_states(), 3);
        assert_eq!(nfa.targets(0, 'a'), &[1]);
        assert_eq!(nfa.targets(1, 'a'), &[1]);
        assert_eq!(nfa.targets(0, 'b'), &[2]);
        assert_eq!(nfa.targets(1, 'b'), &[2]);
        assert!(nfa.is_terminal(2).unwrap());
    }
}
