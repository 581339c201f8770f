use std::collections::BTreeMap;

use bit_set::BitSet;

use super::{Acceptor, Automaton, Dfa, FADef, FaError, StateId, States};
use crate::alphabet::Alphabet;

/// Deterministic transducer whose outputs hang off the edges.
///
/// A Mealy machine has no final states: `accepts` always fails with
/// `NotAnAcceptor`, and final states in the definition are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealyMachine {
    dfa: Dfa,
    outputs: Vec<BTreeMap<char, String>>,
}

impl MealyMachine {
    pub fn new<I, S, O>(def: &FADef, outputs: I) -> Result<MealyMachine, FaError>
    where
        I: IntoIterator<Item = ((S, char), O)>,
        S: AsRef<str>,
        O: Into<String>,
    {
        let dfa = Dfa::new(def)?.without_finals();

        let mut table: Vec<BTreeMap<char, String>> = vec![BTreeMap::new(); dfa.states().len()];
        for ((state, symbol), value) in outputs {
            let state = dfa.states().require(state.as_ref())?;
            dfa.alphabet().check_symbol(symbol)?;
            table[state].insert(symbol, value.into());
        }

        Ok(MealyMachine {
            dfa,
            outputs: table,
        })
    }

    /// Next state and the output on the edge taken, `None` if the edge has none.
    pub fn step(&self, state: StateId, symbol: char) -> Result<(StateId, Option<&str>), FaError> {
        let next = self.dfa.step(state, symbol)?;
        let output = self.outputs[state].get(&symbol).map(String::as_str);
        Ok((next, output))
    }

    /// One output per consumed symbol.
    pub fn process(&self, input: &str) -> Result<Vec<Option<&str>>, FaError> {
        let mut state = self.dfa.start();
        let mut outputs = Vec::new();

        for (position, symbol) in input.chars().enumerate() {
            self.dfa.alphabet().check_input(position, symbol)?;
            let (next, output) = self.step(state, symbol)?;
            outputs.push(output);
            state = next;
        }

        Ok(outputs)
    }
}

impl Acceptor for MealyMachine {
    fn accepts(&self, _input: &str) -> Result<bool, FaError> {
        Err(FaError::NotAnAcceptor)
    }
}

impl Automaton for MealyMachine {
    fn alphabet(&self) -> &Alphabet {
        self.dfa.alphabet()
    }

    fn states(&self) -> &States {
        self.dfa.states()
    }

    fn start(&self) -> StateId {
        self.dfa.start()
    }

    fn accept_states(&self) -> &BitSet {
        self.dfa.accept_states()
    }

    fn transitions(&self) -> Vec<(StateId, Option<char>, StateId)> {
        self.dfa.transitions()
    }
}
