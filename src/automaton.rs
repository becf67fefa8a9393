/* Graph store of the automaton. States are dense ids, edges live on their source state keyed by
 * symbol, and edges may point at target ids which were never created. Such ids are backed by a
 * freshly allocated state and remembered in an alias table. */

use bitvec::prelude::*;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::fa::{AutomatonError, StateId, Symbol, FA};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<T> {
    id: StateId,
    initial: bool,
    transitions: BTreeMap<T, Vec<StateId>>, // Targets keep insertion order per symbol
}

impl<T: Symbol> State<T> {
    pub(crate) fn new(id: StateId, initial: bool) -> Self {
        State {
            id,
            initial,
            transitions: BTreeMap::new(),
        }
    }

    pub fn get_id(&self) -> StateId {
        self.id
    }

    /// Informational only, the automaton's start state decides where a traversal begins.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Get all outgoing transitions of the state, ordered by symbol
    pub fn get_transitions(&self) -> &BTreeMap<T, Vec<StateId>> {
        &self.transitions
    }

    pub fn has_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }

    pub(crate) fn add_transition(&mut self, symbol: T, to: StateId) -> bool {
        let targets = self.transitions.entry(symbol).or_default();
        if targets.contains(&to) {
            return false;
        }
        targets.push(to);
        true
    }

    pub(crate) fn remove_transition(&mut self, symbol: T, to: StateId) -> bool {
        let Some(targets) = self.transitions.get_mut(&symbol) else {
            return false;
        };
        let Some(position) = targets.iter().position(|&target| target == to) else {
            return false;
        };
        targets.remove(position);
        if targets.is_empty() {
            self.transitions.remove(&symbol);
        }
        true
    }

    pub(crate) fn remove_symbol(&mut self, symbol: T) {
        self.transitions.remove(&symbol);
    }
}

/// A finite automaton over the alphabet `T`. While it carries epsilon edges or several edges per
/// symbol it is an NFA; after [`Automaton::determinize`] it is a DFA with the same language.
#[derive(Debug, Clone)]
pub struct Automaton<T = char> {
    pub(crate) states: Vec<State<T>>,
    pub(crate) start_state: StateId,
    pub(crate) accept_states: BitVec<u8>,
    pub(crate) alphabet: BTreeSet<T>,
    pub(crate) epsilon: T,
    pub(crate) aliases: HashMap<StateId, StateId>,
}

impl<T: Symbol> Automaton<T> {
    /// Create an automaton with a single non terminal initial state 0. `epsilon` is the symbol
    /// reserved for epsilon edges.
    pub fn new(epsilon: T) -> Self {
        Automaton {
            states: vec![State::new(0, true)],
            start_state: 0,
            accept_states: BitVec::repeat(false, 1),
            alphabet: BTreeSet::new(),
            epsilon,
            aliases: HashMap::new(),
        }
    }

    /// Create an automaton with `num_states` non terminal states and no edges. State 0 is the
    /// initial state, and there is always at least one state.
    pub fn with_states(epsilon: T, num_states: usize) -> Self {
        let mut result = Automaton::new(epsilon);
        result.states.reserve(num_states.saturating_sub(1));
        for _ in 1..num_states {
            result.add_state(false);
        }
        result
    }

    /// Append a state and return its id. The id always addresses the new state: a placeholder
    /// registered under the same number stops resolving once the id is allocated.
    pub fn add_state(&mut self, terminal: bool) -> StateId {
        let state_id = self.states.len();
        self.states.push(State::new(state_id, false));
        self.accept_states.push(terminal);
        if let Some(previous) = self.aliases.remove(&state_id) {
            debug!(
                "Placeholder {} was backed by state {}, it now names the new state",
                state_id, previous
            );
        }
        state_id
    }

    /// Map an id to the state it stands for. Allocated ids address themselves, other ids go
    /// through the alias table.
    pub fn resolve(&self, id: StateId) -> Result<StateId, AutomatonError> {
        if id < self.states.len() {
            Ok(id)
        } else if let Some(&real) = self.aliases.get(&id) {
            Ok(real)
        } else {
            Err(AutomatonError::InvalidReference(id))
        }
    }

    /// Return the state behind `id`, allocating a non terminal state for it if the id is not
    /// known yet.
    pub fn reserve(&mut self, id: StateId) -> StateId {
        if let Ok(real) = self.resolve(id) {
            return real;
        }
        let real = self.add_state(false);
        if real != id {
            self.aliases.insert(id, real);
        }
        trace!("Reserved state {} for placeholder {}", real, id);
        real
    }

    /// Add the edge `from --symbol--> to`. The source has to exist already, the target is
    /// reserved on first use. `terminal` marks the target as accepting, it never clears the flag.
    pub fn add_edge(
        &mut self,
        from: StateId,
        symbol: T,
        to: StateId,
        terminal: bool,
    ) -> Result<(), AutomatonError> {
        let from = self
            .resolve(from)
            .map_err(|_| AutomatonError::UndeclaredSource(from))?;
        let to = self.reserve(to);

        self.insert_edge(from, symbol, to);
        if terminal {
            self.accept_states.set(to, true);
        }
        Ok(())
    }

    /// Insert an edge between two allocated states.
    pub(crate) fn insert_edge(&mut self, from: StateId, symbol: T, to: StateId) {
        self.states[from].add_transition(symbol, to);
        self.alphabet.insert(symbol);
    }

    /// Flip the terminal flag of a state and return the new value.
    pub fn toggle_terminal(&mut self, id: StateId) -> Result<bool, AutomatonError> {
        let id = self.resolve(id)?;
        let terminal = !self.accept_states[id];
        self.accept_states.set(id, terminal);
        Ok(terminal)
    }

    pub fn is_terminal(&self, id: StateId) -> Result<bool, AutomatonError> {
        let id = self.resolve(id)?;
        Ok(self.accept_states[id])
    }

    /// Remove one edge. Removing an edge which does not exist is allowed and returns `false`.
    pub fn remove_edge(
        &mut self,
        from: StateId,
        symbol: T,
        to: StateId,
    ) -> Result<bool, AutomatonError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;

        let removed = self.states[from].remove_transition(symbol, to);
        if removed && !self.symbol_in_use(symbol) {
            self.alphabet.remove(&symbol);
        }
        Ok(removed)
    }

    fn symbol_in_use(&self, symbol: T) -> bool {
        self.states
            .iter()
            .any(|state| state.transitions.contains_key(&symbol))
    }

    /// Delete every edge labelled `symbol` and drop it from the alphabet.
    pub(crate) fn drop_symbol(&mut self, symbol: T) {
        for state in self.states.iter_mut() {
            state.remove_symbol(symbol);
        }
        self.alphabet.remove(&symbol);
    }

    pub fn initial_state_id(&self) -> StateId {
        self.start_state
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn alphabet(&self) -> &BTreeSet<T> {
        &self.alphabet
    }

    pub fn epsilon(&self) -> T {
        self.epsilon
    }

    pub fn get_state(&self, id: StateId) -> Option<&State<T>> {
        self.states.get(id)
    }

    /// Targets of all edges leaving the allocated state `id` under `symbol`, in insertion order.
    pub fn targets(&self, id: StateId, symbol: T) -> &[StateId] {
        self.states
            .get(id)
            .and_then(|state| state.transitions.get(&symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every edge as `(from, symbol, to)`, ordered by source and then by symbol.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, T, StateId)> + '_ {
        self.states.iter().flat_map(|state| {
            state.transitions.iter().flat_map(move |(&symbol, targets)| {
                targets.iter().map(move |&to| (state.id, symbol, to))
            })
        })
    }

    /// True when no state has an epsilon edge or more than one edge for the same symbol.
    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|state| {
            state
                .transitions
                .iter()
                .all(|(symbol, targets)| *symbol != self.epsilon && targets.len() <= 1)
        })
    }
}

impl<T: Symbol> FA for Automaton<T> {
    type Symbol = T;

    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_start_state(&self) -> StateId {
        self.start_state
    }

    fn get_alphabet(&self) -> &BTreeSet<T> {
        &self.alphabet
    }

    fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    fn get_epsilon(&self) -> T {
        self.epsilon
    }

    fn get_state_transitions(&self, state_id: StateId) -> Vec<(T, StateId)> {
        let mut transition_list = Vec::new();
        for (symbol, targets) in self.states[state_id].transitions.iter() {
            for target in targets {
                transition_list.push((*symbol, *target));
            }
        }
        transition_list
    }
}
