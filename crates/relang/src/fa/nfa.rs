use std::collections::BTreeMap;

use bit_set::BitSet;
use relang_re::Regex;

use super::{Acceptor, Automaton, FADef, FaError, StateId, States};
use crate::alphabet::Alphabet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaNode {
    // None = epsilon
    pub(crate) transitions: BTreeMap<Option<char>, BitSet>,
}

/// Non-deterministic finite automaton with epsilon edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    alphabet: Alphabet,
    states: States,
    nodes: Vec<NfaNode>,
    initial_state: StateId,
    accept_states: BitSet,
}

impl Nfa {
    /// Builds the automaton, normalizing every transition's targets into a
    /// set. Repeated entries for one (state, label) pair are merged.
    pub fn new(def: &FADef) -> Result<Nfa, FaError> {
        let resolved = def.resolve()?;
        let mut nodes = vec![NfaNode::default(); resolved.states.len()];

        for edge in resolved.edges {
            if edge.targets.is_empty() {
                continue;
            }
            nodes[edge.from]
                .transitions
                .entry(edge.label)
                .or_default()
                .union_with(&edge.targets);
        }

        Ok(Nfa {
            alphabet: resolved.alphabet,
            states: resolved.states,
            nodes,
            initial_state: resolved.initial_state,
            accept_states: resolved.accept_states,
        })
    }

    // creates an NFA from a regex using Thompson's construction
    // guaranteed to only have one accept state
    pub fn from_regex(re: &Regex, alphabet: &Alphabet) -> Nfa {
        let mut nodes: Vec<NfaNode> = Vec::new();
        let (start, end) = Self::recursive_helper(re, &mut nodes);

        let mut states = States::default();
        for i in 0..nodes.len() {
            states.intern(&format!("t{}", i));
        }

        let mut alphabet = alphabet.clone();
        alphabet.extend(re.symbols());

        let mut accept_states = BitSet::with_capacity(nodes.len());
        accept_states.insert(end.index());

        Nfa {
            alphabet,
            states,
            nodes,
            initial_state: start,
            accept_states,
        }
    }

    fn add_edge(nodes: &mut [NfaNode], from: StateId, label: Option<char>, to: StateId) {
        nodes[from]
            .transitions
            .entry(label)
            .or_default()
            .insert(to.index());
    }

    // re + mutable nodes -> (initial, accept)
    fn recursive_helper(re: &Regex, nodes: &mut Vec<NfaNode>) -> (StateId, StateId) {
        match re {
            Regex::Symbol(c) => {
                let end = StateId::from_push(nodes, NfaNode::default());
                let start = StateId::from_push(nodes, NfaNode::default());
                Self::add_edge(nodes, start, Some(*c), end);
                (start, end)
            }
            Regex::EmptyString => {
                let end = StateId::from_push(nodes, NfaNode::default());
                let start = StateId::from_push(nodes, NfaNode::default());
                Self::add_edge(nodes, start, None, end);
                (start, end)
            }
            Regex::EmptySet => {
                // no path from start to end
                let end = StateId::from_push(nodes, NfaNode::default());
                let start = StateId::from_push(nodes, NfaNode::default());
                (start, end)
            }
            Regex::Union(left, right) => {
                let (left_start, left_end) = Self::recursive_helper(left, nodes);
                let (right_start, right_end) = Self::recursive_helper(right, nodes);

                let end = StateId::from_push(nodes, NfaNode::default());
                let start = StateId::from_push(nodes, NfaNode::default());
                Self::add_edge(nodes, start, None, left_start);
                Self::add_edge(nodes, start, None, right_start);
                Self::add_edge(nodes, left_end, None, end);
                Self::add_edge(nodes, right_end, None, end);
                (start, end)
            }
            Regex::Concat(left, right) => {
                let (left_start, left_end) = Self::recursive_helper(left, nodes);
                let (right_start, right_end) = Self::recursive_helper(right, nodes);
                Self::add_edge(nodes, left_end, None, right_start);
                (left_start, right_end)
            }
            Regex::KleeneStar(inner) => {
                let (inner_start, inner_end) = Self::recursive_helper(inner, nodes);

                let end = StateId::from_push(nodes, NfaNode::default());
                Self::add_edge(nodes, inner_end, None, inner_start);
                Self::add_edge(nodes, inner_end, None, end);

                let start = StateId::from_push(nodes, NfaNode::default());
                Self::add_edge(nodes, start, None, inner_start);
                Self::add_edge(nodes, start, None, end);
                (start, end)
            }
        }
    }

    /// All states reachable from `states` through epsilon edges alone,
    /// including `states` themselves.
    pub fn epsilon_closure(&self, states: &BitSet) -> BitSet {
        let mut closure = states.clone();
        let mut stack: Vec<usize> = states.iter().collect();

        while let Some(i) = stack.pop() {
            let Some(targets) = self.nodes.get(i).and_then(|node| node.transitions.get(&None)) else {
                continue;
            };
            for next in targets.iter() {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// Targets of the `symbol` edges out of `state`, without closing over
    /// epsilon edges. A state with no outgoing edges at all yields the empty
    /// set before the alphabet is consulted.
    pub fn step(&self, state: StateId, symbol: char) -> Result<BitSet, FaError> {
        let node = match self.nodes.get(state.index()) {
            Some(node) if !node.transitions.is_empty() => node,
            _ => return Ok(BitSet::new()),
        };
        self.alphabet.check_symbol(symbol)?;

        Ok(node
            .transitions
            .get(&Some(symbol))
            .cloned()
            .unwrap_or_default())
    }

    pub fn step_set(&self, states: &BitSet, symbol: char) -> Result<BitSet, FaError> {
        let mut next = BitSet::with_capacity(self.states.len());
        for state in states.iter() {
            next.union_with(&self.step(StateId::from_index(state), symbol)?);
        }
        Ok(self.epsilon_closure(&next))
    }

    // step_set for a symbol already known to be in the alphabet
    pub(crate) fn advance(&self, states: &BitSet, symbol: char) -> BitSet {
        let mut next = BitSet::with_capacity(self.states.len());
        for state in states.iter() {
            let targets = self
                .nodes
                .get(state)
                .and_then(|node| node.transitions.get(&Some(symbol)));
            if let Some(targets) = targets {
                next.union_with(targets);
            }
        }
        self.epsilon_closure(&next)
    }
}

impl Acceptor for Nfa {
    fn accepts(&self, input: &str) -> Result<bool, FaError> {
        let mut start = BitSet::with_capacity(self.states.len());
        start.insert(self.initial_state.index());
        let mut current = self.epsilon_closure(&start);

        for (position, symbol) in input.chars().enumerate() {
            self.alphabet.check_input(position, symbol)?;
            current = self.step_set(&current, symbol)?;
            if current.is_empty() {
                return Ok(false);
            }
        }

        Ok(!current.is_disjoint(&self.accept_states))
    }
}

impl Automaton for Nfa {
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
        let mut transitions = Vec::new();
        for from in self.states.ids() {
            for (label, targets) in &self.nodes[from].transitions {
                transitions.extend(targets.iter().map(|to| (from, *label, StateId::from_index(to))));
            }
        }
        transitions
    }
}
