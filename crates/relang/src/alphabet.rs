use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fa::FaError;

/// Input symbols of an automaton or grammar. Epsilon is never a member, it
/// is spelled as a `None` transition label instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet(BTreeSet<char>);

impl Alphabet {
    pub fn new<I>(symbols: I) -> Alphabet
    where
        I: IntoIterator<Item = char>,
    {
        Alphabet(symbols.into_iter().collect())
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn extend<I>(&mut self, symbols: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.0.extend(symbols)
    }

    // membership check for a single step
    pub(crate) fn check_symbol(&self, symbol: char) -> Result<(), FaError> {
        if self.contains(symbol) {
            Ok(())
        } else {
            Err(FaError::SymbolNotInAlphabet(symbol))
        }
    }

    // membership check for the character at `position` of a whole input
    pub(crate) fn check_input(&self, position: usize, symbol: char) -> Result<(), FaError> {
        if self.contains(symbol) {
            Ok(())
        } else {
            Err(FaError::InvalidInputSymbol { position, symbol })
        }
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Alphabet::new(iter)
    }
}
