use bit_set::BitSet;

use super::{Acceptor, Automaton, Dfa, FADef, FaError, StateId, States};
use crate::alphabet::Alphabet;

/// Deterministic automaton that emits a value on entering each state.
/// Unlike a Mealy machine it is also an acceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MooreMachine {
    dfa: Dfa,
    outputs: Vec<Option<String>>,
}

impl MooreMachine {
    pub fn new<I, S, O>(def: &FADef, outputs: I) -> Result<MooreMachine, FaError>
    where
        I: IntoIterator<Item = (S, O)>,
        S: AsRef<str>,
        O: Into<String>,
    {
        let dfa = Dfa::new(def)?;

        let mut table: Vec<Option<String>> = vec![None; dfa.states().len()];
        for (state, value) in outputs {
            let state = dfa.states().require(state.as_ref())?;
            table[state] = Some(value.into());
        }

        Ok(MooreMachine {
            dfa,
            outputs: table,
        })
    }

    pub fn step(&self, state: StateId, symbol: char) -> Result<StateId, FaError> {
        self.dfa.step(state, symbol)
    }

    /// `None` when the state has no output, or is not a state of this machine.
    pub fn output(&self, state: StateId) -> Option<&str> {
        self.outputs.get(state.index()).and_then(Option::as_deref)
    }

    /// Output of the start state followed by one output per consumed symbol.
    pub fn process(&self, input: &str) -> Result<Vec<Option<&str>>, FaError> {
        let mut state = self.dfa.start();
        let mut outputs = vec![self.output(state)];

        for (position, symbol) in input.chars().enumerate() {
            self.dfa.alphabet().check_input(position, symbol)?;
            state = self.step(state, symbol)?;
            outputs.push(self.output(state));
        }

        Ok(outputs)
    }
}

impl Acceptor for MooreMachine {
    fn accepts(&self, input: &str) -> Result<bool, FaError> {
        self.dfa.accepts(input)
    }
}

impl Automaton for MooreMachine {
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
