use std::collections::{BTreeMap, HashMap, VecDeque};

use bit_set::BitSet;

use super::{Acceptor, Automaton, FADef, FaError, Nfa, StateId, States};
use crate::alphabet::Alphabet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DfaNode {
    pub(crate) transitions: BTreeMap<char, StateId>,
}

/// Deterministic finite automaton. The transition relation is a partial
/// function: a missing edge is a `NoTransition` error, not a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: Alphabet,
    states: States,
    nodes: Vec<DfaNode>,
    initial_state: StateId,
    accept_states: BitSet,
}

impl Dfa {
    pub fn new(def: &FADef) -> Result<Dfa, FaError> {
        let resolved = def.resolve()?;
        let mut nodes = vec![DfaNode::default(); resolved.states.len()];

        for edge in resolved.edges {
            let symbol = edge
                .label
                .ok_or_else(|| FaError::EpsilonTransition(resolved.states.label(edge.from)))?;

            for target in edge.targets.iter().map(StateId::from_index) {
                let previous = nodes[edge.from].transitions.insert(symbol, target);
                if previous.is_some_and(|previous| previous != target) {
                    return Err(FaError::Nondeterministic {
                        state: resolved.states.label(edge.from),
                        symbol,
                    });
                }
            }
        }

        Ok(Dfa {
            alphabet: resolved.alphabet,
            states: resolved.states,
            nodes,
            initial_state: resolved.initial_state,
            accept_states: resolved.accept_states,
        })
    }

    // creates a DFA from an NFA using subset construction
    // the empty subset is kept as a dead state so the result has no missing edges
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let alphabet = nfa.alphabet().clone();

        let mut start = BitSet::new();
        start.insert(nfa.start().index());
        let initial_configuration = nfa.epsilon_closure(&start);

        // configuration -> id, ids are handed out in discovery order
        let mut subsets: HashMap<BitSet, StateId> = HashMap::new();
        let mut configurations: Vec<BitSet> = Vec::new();
        let mut work_queue: VecDeque<StateId> = VecDeque::new();

        let initial_state = StateId::from_push(&mut configurations, initial_configuration.clone());
        subsets.insert(initial_configuration, initial_state);
        work_queue.push_back(initial_state);

        let mut nodes: Vec<DfaNode> = Vec::new();
        while let Some(id) = work_queue.pop_front() {
            let q = configurations[id.index()].clone();
            let mut transitions = BTreeMap::new();

            for symbol in alphabet.iter() {
                let t = nfa.advance(&q, symbol);
                let next = match subsets.get(&t) {
                    Some(next) => *next,
                    None => {
                        let next = StateId::from_push(&mut configurations, t.clone());
                        subsets.insert(t, next);
                        work_queue.push_back(next);
                        next
                    }
                };
                transitions.insert(symbol, next);
            }

            // FIFO order keeps nodes aligned with configuration ids
            nodes.push(DfaNode { transitions });
        }

        let mut states = States::default();
        let mut accept_states = BitSet::with_capacity(configurations.len());
        for (i, configuration) in configurations.iter().enumerate() {
            let names: Vec<&str> = nfa.states().names_of(configuration).into_iter().collect();
            states.fresh(&format!("{{{}}}", names.join(",")));

            if !configuration.is_disjoint(nfa.accept_states()) {
                accept_states.insert(i);
            }
        }

        Dfa {
            alphabet,
            states,
            nodes,
            initial_state,
            accept_states,
        }
    }

    pub fn step(&self, state: StateId, symbol: char) -> Result<StateId, FaError> {
        if !self.states.contains(state) {
            return Err(FaError::UnknownState(state));
        }
        self.alphabet.check_symbol(symbol)?;

        self.nodes[state]
            .transitions
            .get(&symbol)
            .copied()
            .ok_or_else(|| FaError::NoTransition {
                state: self.states.label(state),
                symbol,
            })
    }

    // state reached after consuming all of `input`
    pub(crate) fn run(&self, input: &str) -> Result<StateId, FaError> {
        let mut state = self.initial_state;
        for (position, symbol) in input.chars().enumerate() {
            self.alphabet.check_input(position, symbol)?;
            state = self.step(state, symbol)?;
        }
        Ok(state)
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.accept_states.contains(state.index())
    }

    // drops the final states, for machines that are not acceptors
    pub(crate) fn without_finals(mut self) -> Dfa {
        self.accept_states.clear();
        self
    }
}

impl Acceptor for Dfa {
    fn accepts(&self, input: &str) -> Result<bool, FaError> {
        let state = self.run(input)?;
        Ok(self.is_final(state))
    }
}

impl Automaton for Dfa {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn states(&self) -> &States {
        &self.states
    }

    fn start(&self) -> StateId {
        self.initial_state
    }

    fn accept_states(&self) -> &BitSet {
        &self.accept_states
    }

    fn transitions(&self) -> Vec<(StateId, Option<char>, StateId)> {
        self.states
            .ids()
            .flat_map(|from| {
                self.nodes[from]
                    .transitions
                    .iter()
                    .map(move |(symbol, to)| (from, Some(*symbol), *to))
            })
            .collect()
    }
}
