use std::collections::BTreeSet;
use std::fmt;

use relang_re::EPSILON_GLYPH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fa::{FADef, Nfa};

// name of the synthetic final state, primed until it is not a variable
const SYNTHETIC_FINAL: &str = "[Final]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrammarType {
    /// `A -> aB`
    RightLinear,
    /// `A -> Ba`
    LeftLinear,
}

impl fmt::Display for GrammarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarType::RightLinear => write!(f, "right-linear"),
            GrammarType::LeftLinear => write!(f, "left-linear"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionBody {
    Epsilon,
    Terminal(char),
    // the side `variable` sits on is given by the production's grammar type
    Linear { terminal: char, variable: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    head: String,
    body: ProductionBody,
    grammar_type: GrammarType,
}

impl Production {
    /// `head -> ε`
    pub fn epsilon(head: impl Into<String>, grammar_type: GrammarType) -> Production {
        Production {
            head: head.into(),
            body: ProductionBody::Epsilon,
            grammar_type,
        }
    }

    /// `head -> terminal`
    pub fn terminal(head: impl Into<String>, terminal: char, grammar_type: GrammarType) -> Production {
        Production {
            head: head.into(),
            body: ProductionBody::Terminal(terminal),
            grammar_type,
        }
    }

    /// `head -> terminal variable`
    pub fn right_linear(head: impl Into<String>, terminal: char, variable: impl Into<String>) -> Production {
        Production {
            head: head.into(),
            body: ProductionBody::Linear {
                terminal,
                variable: variable.into(),
            },
            grammar_type: GrammarType::RightLinear,
        }
    }

    /// `head -> variable terminal`
    pub fn left_linear(head: impl Into<String>, variable: impl Into<String>, terminal: char) -> Production {
        Production {
            head: head.into(),
            body: ProductionBody::Linear {
                terminal,
                variable: variable.into(),
            },
            grammar_type: GrammarType::LeftLinear,
        }
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn body(&self) -> &ProductionBody {
        &self.body
    }

    pub fn grammar_type(&self) -> GrammarType {
        self.grammar_type
    }

    pub fn is_epsilon(&self) -> bool {
        self.body == ProductionBody::Epsilon
    }

    pub fn terminal_symbol(&self) -> Option<char> {
        match &self.body {
            ProductionBody::Epsilon => None,
            ProductionBody::Terminal(terminal) | ProductionBody::Linear { terminal, .. } => Some(*terminal),
        }
    }

    pub fn variable(&self) -> Option<&str> {
        match &self.body {
            ProductionBody::Linear { variable, .. } => Some(variable),
            _ => None,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.head)?;
        match (&self.body, self.grammar_type) {
            (ProductionBody::Epsilon, _) => write!(f, "{}", EPSILON_GLYPH),
            (ProductionBody::Terminal(terminal), _) => write!(f, "{}", terminal),
            (ProductionBody::Linear { terminal, variable }, GrammarType::RightLinear) => {
                write!(f, "{}{}", terminal, variable)
            }
            (ProductionBody::Linear { terminal, variable }, GrammarType::LeftLinear) => {
                write!(f, "{}{}", variable, terminal)
            }
        }
    }
}

/// Reasons a grammar is rejected at construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("start variable `{0}` is not a variable")]
    UnknownStartVariable(String),
    #[error("`{0}` is both a variable and a terminal")]
    NotDisjoint(String),
    #[error("variable `{0}` is not declared")]
    UndeclaredVariable(String),
    #[error("terminal '{0}' is not declared")]
    UndeclaredTerminal(char),
    #[error("production `{production}` is not {expected}")]
    OrientationMismatch { production: String, expected: GrammarType },
}

/// A right-linear or left-linear grammar. Every production has the grammar's
/// orientation, and all names it uses are declared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegularGrammar {
    variables: BTreeSet<String>,
    terminals: BTreeSet<char>,
    productions: Vec<Production>,
    start_variable: String,
    grammar_type: GrammarType,
}

impl RegularGrammar {
    pub fn new<V, S, T>(
        variables: V,
        terminals: T,
        productions: Vec<Production>,
        start_variable: impl Into<String>,
        grammar_type: GrammarType,
    ) -> Result<RegularGrammar, GrammarError>
    where
        V: IntoIterator<Item = S>,
        S: Into<String>,
        T: IntoIterator<Item = char>,
    {
        let variables: BTreeSet<String> = variables.into_iter().map(Into::into).collect();
        let terminals: BTreeSet<char> = terminals.into_iter().collect();
        let start_variable = start_variable.into();

        if !variables.contains(&start_variable) {
            return Err(GrammarError::UnknownStartVariable(start_variable));
        }

        for terminal in &terminals {
            let name = terminal.to_string();
            if variables.contains(&name) {
                return Err(GrammarError::NotDisjoint(name));
            }
        }

        for production in &productions {
            if !variables.contains(&production.head) {
                return Err(GrammarError::UndeclaredVariable(production.head.clone()));
            }
            if production.grammar_type != grammar_type {
                return Err(GrammarError::OrientationMismatch {
                    production: production.to_string(),
                    expected: grammar_type,
                });
            }
            if let Some(terminal) = production.terminal_symbol() {
                if !terminals.contains(&terminal) {
                    return Err(GrammarError::UndeclaredTerminal(terminal));
                }
            }
            if let Some(variable) = production.variable() {
                if !variables.contains(variable) {
                    return Err(GrammarError::UndeclaredVariable(variable.to_string()));
                }
            }
        }

        Ok(RegularGrammar {
            variables,
            terminals,
            productions,
            start_variable,
            grammar_type,
        })
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.iter().map(String::as_str)
    }

    pub fn terminals(&self) -> impl Iterator<Item = char> + '_ {
        self.terminals.iter().copied()
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn start_variable(&self) -> &str {
        &self.start_variable
    }

    pub fn grammar_type(&self) -> GrammarType {
        self.grammar_type
    }

    pub fn productions_for<'a>(&'a self, variable: &'a str) -> impl Iterator<Item = &'a Production> + 'a {
        self.productions
            .iter()
            .filter(move |production| production.head == variable)
    }

    // every linear body carries a terminal, so only epsilon bodies derive ε
    pub fn nullable_variables(&self) -> BTreeSet<&str> {
        self.productions
            .iter()
            .filter(|production| production.is_epsilon())
            .map(|production| production.head.as_str())
            .collect()
    }

    pub fn derives_epsilon(&self) -> bool {
        self.nullable_variables().contains(self.start_variable.as_str())
    }

    /// Builds an equivalent NFA: one state per variable, plus one shared
    /// final state for the terminal-only productions if there are any.
    ///
    /// Left-linear productions `A -> Ba` become edges `B -a-> A`, reading the
    /// derivation from its last variable forward. This mapping is not known
    /// to preserve the language of every left-linear grammar.
    pub fn to_automaton(&self) -> Nfa {
        let mut def = FADef::new(self.terminals.iter().copied()).start(self.start_variable.as_str());
        for variable in &self.variables {
            def = def.state(variable.as_str());
        }

        let mut synthetic_final: Option<String> = None;
        for production in &self.productions {
            let head = production.head.as_str();
            match &production.body {
                ProductionBody::Epsilon => {
                    def = def.finals([head]);
                }
                ProductionBody::Terminal(terminal) => {
                    let last = synthetic_final.get_or_insert_with(|| self.fresh_final()).clone();
                    def = def.edge(head, *terminal, last);
                }
                ProductionBody::Linear { terminal, variable } => {
                    def = match self.grammar_type {
                        GrammarType::RightLinear => def.edge(head, *terminal, variable.as_str()),
                        GrammarType::LeftLinear => def.edge(variable.as_str(), *terminal, head),
                    };
                }
            }
        }

        if let Some(last) = synthetic_final {
            def = def.state(last.as_str()).finals([last]);
        }

        Nfa::new(&def).expect("validated grammar always yields a well-formed automaton")
    }

    fn fresh_final(&self) -> String {
        let mut name = SYNTHETIC_FINAL.to_string();
        while self.variables.contains(&name) {
            name.push('\'');
        }
        name
    }
}

impl fmt::Display for RegularGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variables: Vec<&str> = self.variables().collect();
        let terminals: Vec<String> = self.terminals().map(String::from).collect();

        writeln!(f, "regular grammar ({})", self.grammar_type)?;
        writeln!(f, "variables: {}", variables.join(","))?;
        writeln!(f, "terminals: {}", terminals.join(","))?;
        writeln!(f, "start: {}", self.start_variable)?;
        write!(f, "productions:")?;
        for production in &self.productions {
            write!(f, "\n  {}", production)?;
        }
        Ok(())
    }
}
