// finite automata over `char` symbols
//
// pointer-based graphs in safe rust are awkward, so states are interned into
// `StateId` indices and every table is a Vec indexed by them. sets of states
// are BitSets over the same indices. a `None` transition label is an epsilon
// edge.
//
// all automata are immutable once built, so shared references can be handed
// to several threads at once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bit_set::BitSet;
use relang_re::Regex;
use relang_util::make_type_idx;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alphabet::Alphabet;

mod dfa;
mod elimination;
mod mealy;
mod moore;
mod nfa;

pub use dfa::Dfa;
pub use mealy::MealyMachine;
pub use moore::MooreMachine;
pub use nfa::Nfa;

make_type_idx!(
    pub StateId,
    String,
    dfa::DfaNode,
    nfa::NfaNode,
    Option<String>,
    BTreeMap<char, String>
);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaError {
    #[error("unknown state {0:?}")]
    UnknownState(StateId),
    #[error("symbol '{0}' not in alphabet")]
    SymbolNotInAlphabet(char),
    #[error("no transition from state `{state}` on symbol '{symbol}'")]
    NoTransition { state: String, symbol: char },
    #[error("invalid input symbol at position {position}: '{symbol}' not in alphabet")]
    InvalidInputSymbol { position: usize, symbol: char },
    #[error("mealy machines are not acceptors")]
    NotAnAcceptor,
    #[error("automaton has no final state")]
    NoFinalState,
    #[error("state `{0}` is not declared")]
    UndeclaredState(String),
    #[error("epsilon transition from `{0}` in a deterministic automaton")]
    EpsilonTransition(String),
    #[error("more than one transition from `{state}` on symbol '{symbol}'")]
    Nondeterministic { state: String, symbol: char },
}

/// Read-only view shared by every automaton flavour.
pub trait Automaton {
    fn alphabet(&self) -> &Alphabet;
    fn states(&self) -> &States;
    fn start(&self) -> StateId;
    fn accept_states(&self) -> &BitSet;

    /// Every edge as `(from, label, to)`; `None` labels are epsilon edges.
    fn transitions(&self) -> Vec<(StateId, Option<char>, StateId)>;

    /// An equivalent regular expression, built by state elimination.
    fn to_regex(&self) -> Result<Regex, FaError> {
        elimination::state_elimination(self)
    }
}

pub trait Acceptor {
    fn accepts(&self, input: &str) -> Result<bool, FaError>;
}

/// Name table for the states of one automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct States {
    names: Vec<String>,
    lookup: HashMap<String, StateId>,
}

impl States {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<StateId> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, state: StateId) -> Option<&str> {
        self.names.get(state.index()).map(String::as_str)
    }

    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (StateId::from_index(i), name.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = StateId> {
        (0..self.names.len()).map(StateId::from_index)
    }

    pub fn names_of(&self, set: &BitSet) -> BTreeSet<&str> {
        set.iter()
            .filter_map(|i| self.names.get(i))
            .map(String::as_str)
            .collect()
    }

    pub fn set_of<'a, I>(&self, names: I) -> Result<BitSet, FaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = BitSet::with_capacity(self.len());
        for name in names {
            set.insert(self.require(name)?.index());
        }
        Ok(set)
    }

    pub(crate) fn intern(&mut self, name: &str) -> StateId {
        if let Some(id) = self.get(name) {
            return id;
        }
        let id = StateId::from_push(&mut self.names, name.to_string());
        self.lookup.insert(name.to_string(), id);
        id
    }

    // interns `base`, priming it until it no longer clashes with a known name
    pub(crate) fn fresh(&mut self, base: &str) -> StateId {
        let mut name = base.to_string();
        while self.lookup.contains_key(&name) {
            name.push('\'');
        }
        self.intern(&name)
    }

    pub(crate) fn require(&self, name: &str) -> Result<StateId, FaError> {
        self.get(name)
            .ok_or_else(|| FaError::UndeclaredState(name.to_string()))
    }

    // display name for error payloads
    pub(crate) fn label(&self, state: StateId) -> String {
        match self.name(state) {
            Some(name) => name.to_string(),
            None => format!("{:?}", state),
        }
    }
}

/// Target(s) of one transition entry. A single name and a list of names are
/// both accepted and are normalized to a set when an automaton is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Targets {
    One(String),
    Many(Vec<String>),
}

impl Targets {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Targets::One(name) => vec![name.as_str()],
            Targets::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Targets::One(value.to_string())
    }
}

impl From<String> for Targets {
    fn from(value: String) -> Self {
        Targets::One(value)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(value: Vec<&str>) -> Self {
        Targets::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Targets {
    fn from(value: Vec<String>) -> Self {
        Targets::Many(value)
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(value: [&str; N]) -> Self {
        Targets::Many(value.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub from: String,
    /// `None` for an epsilon edge
    pub symbol: Option<char>,
    pub to: Targets,
}

/// Raw construction data for an automaton.
///
/// The states of the automaton are exactly `states`. The builder methods
/// declare the source of every edge they add, so only states without outgoing
/// edges need an explicit [`FADef::state`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FADef {
    pub alphabet: Alphabet,
    pub states: Vec<String>,
    pub transitions: Vec<TransitionDef>,
    pub start_state: String,
    pub final_states: Vec<String>,
}

impl FADef {
    pub fn new<I>(alphabet: I) -> FADef
    where
        I: IntoIterator<Item = char>,
    {
        FADef {
            alphabet: Alphabet::new(alphabet),
            ..Default::default()
        }
    }

    pub fn state(mut self, name: impl Into<String>) -> FADef {
        self.declare(name.into());
        self
    }

    pub fn edge(self, from: impl Into<String>, symbol: char, to: impl Into<Targets>) -> FADef {
        self.transition(from.into(), Some(symbol), to.into())
    }

    pub fn epsilon(self, from: impl Into<String>, to: impl Into<Targets>) -> FADef {
        self.transition(from.into(), None, to.into())
    }

    pub fn start(mut self, name: impl Into<String>) -> FADef {
        self.start_state = name.into();
        self
    }

    pub fn finals<I, S>(mut self, names: I) -> FADef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.final_states.extend(names.into_iter().map(Into::into));
        self
    }

    fn transition(mut self, from: String, symbol: Option<char>, to: Targets) -> FADef {
        self.declare(from.clone());
        self.transitions.push(TransitionDef { from, symbol, to });
        self
    }

    fn declare(&mut self, name: String) {
        if !self.states.contains(&name) {
            self.states.push(name);
        }
    }

    // checks every name and symbol and interns the states
    pub(crate) fn resolve(&self) -> Result<Resolved, FaError> {
        let mut states = States::default();
        for name in &self.states {
            states.intern(name);
        }

        let initial_state = states.require(&self.start_state)?;

        let mut accept_states = BitSet::with_capacity(states.len());
        for name in &self.final_states {
            accept_states.insert(states.require(name)?.index());
        }

        let mut edges = Vec::with_capacity(self.transitions.len());
        for transition in &self.transitions {
            let from = states.require(&transition.from)?;
            if let Some(symbol) = transition.symbol {
                self.alphabet.check_symbol(symbol)?;
            }

            let mut targets = BitSet::with_capacity(states.len());
            for name in transition.to.names() {
                targets.insert(states.require(name)?.index());
            }

            edges.push(ResolvedEdge {
                from,
                label: transition.symbol,
                targets,
            });
        }

        Ok(Resolved {
            alphabet: self.alphabet.clone(),
            states,
            edges,
            initial_state,
            accept_states,
        })
    }
}

pub(crate) struct ResolvedEdge {
    pub(crate) from: StateId,
    pub(crate) label: Option<char>,
    pub(crate) targets: BitSet,
}

pub(crate) struct Resolved {
    pub(crate) alphabet: Alphabet,
    pub(crate) states: States,
    pub(crate) edges: Vec<ResolvedEdge>,
    pub(crate) initial_state: StateId,
    pub(crate) accept_states: BitSet,
}
