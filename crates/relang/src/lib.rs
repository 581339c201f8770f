mod alphabet;
pub mod fa;
pub mod grammar;


pub use alphabet::Alphabet;
pub use fa::{Acceptor, Automaton, Dfa, FADef, FaError, MealyMachine, MooreMachine, Nfa, StateId, States, Targets};
pub use grammar::{GrammarError, GrammarType, Production, ProductionBody, RegularGrammar};
pub use relang_re::Regex;
