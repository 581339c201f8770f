// regular expression algebra over single `char` symbols
//
// there is no parser: expressions are assembled with the smart constructors
// below, which apply the usual identities as nodes are built
//   ∅|x = x|∅ = x        x|x = x
//   εx = xε = x          ∅x = x∅ = ∅
//   ε* = ∅* = ε          (ε|x)* = (x|ε)* = x*        (x*)* = x*

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const EPSILON_GLYPH: char = '\u{03b5}';
pub const EMPTY_SET_GLYPH: char = '\u{2205}';

/// A regular expression.
///
/// Equality is structural. `Union`, `Concat` and `KleeneStar` nodes should
/// only be built through [`Regex::union`], [`Regex::concat`] and
/// [`Regex::kleene_star`], so that no trivially reducible node (such as
/// `Union(EmptySet, x)`) is ever held in memory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawRegex")]
pub enum Regex {
    /// A single alphabet character.
    Symbol(char),
    /// Matches exactly the empty string.
    EmptyString,
    /// Matches nothing.
    EmptySet,
    Union(Box<Regex>, Box<Regex>),
    Concat(Box<Regex>, Box<Regex>),
    KleeneStar(Box<Regex>),
}

// wire shape of `Regex`. decoded trees are rebuilt through the smart
// constructors, so `{"Union":["EmptySet",x]}` comes back as `x`
#[derive(Deserialize)]
#[serde(rename = "Regex")]
enum RawRegex {
    Symbol(char),
    EmptyString,
    EmptySet,
    Union(Box<RawRegex>, Box<RawRegex>),
    Concat(Box<RawRegex>, Box<RawRegex>),
    KleeneStar(Box<RawRegex>),
}

impl From<RawRegex> for Regex {
    fn from(raw: RawRegex) -> Self {
        match raw {
            RawRegex::Symbol(c) => Regex::Symbol(c),
            RawRegex::EmptyString => Regex::EmptyString,
            RawRegex::EmptySet => Regex::EmptySet,
            RawRegex::Union(left, right) => Regex::union((*left).into(), (*right).into()),
            RawRegex::Concat(left, right) => Regex::concat((*left).into(), (*right).into()),
            RawRegex::KleeneStar(inner) => Regex::kleene_star((*inner).into()),
        }
    }
}

impl Regex {
    pub fn symbol(c: char) -> Regex {
        Regex::Symbol(c)
    }

    pub fn union(left: Regex, right: Regex) -> Regex {
        match (left, right) {
            (Regex::EmptySet, right) => right,
            (left, Regex::EmptySet) => left,
            (left, right) if left == right => left,
            (left, right) => Regex::Union(Box::new(left), Box::new(right)),
        }
    }

    pub fn concat(left: Regex, right: Regex) -> Regex {
        match (left, right) {
            (Regex::EmptyString, right) => right,
            (left, Regex::EmptyString) => left,
            (Regex::EmptySet, _) | (_, Regex::EmptySet) => Regex::EmptySet,
            (left, right) => Regex::Concat(Box::new(left), Box::new(right)),
        }
    }

    pub fn kleene_star(inner: Regex) -> Regex {
        match inner {
            Regex::EmptyString | Regex::EmptySet => Regex::EmptyString,
            Regex::Union(left, right) if *left == Regex::EmptyString => Regex::kleene_star(*right),
            Regex::Union(left, right) if *right == Regex::EmptyString => Regex::kleene_star(*left),
            star @ Regex::KleeneStar(_) => star,
            inner => Regex::KleeneStar(Box::new(inner)),
        }
    }

    /// Left fold of `union`. An empty iterator gives `EmptySet`.
    pub fn alternation<I>(alternates: I) -> Regex
    where
        I: IntoIterator<Item = Regex>,
    {
        alternates.into_iter().fold(Regex::EmptySet, Regex::union)
    }

    /// Left fold of `concat`. An empty iterator gives `EmptyString`.
    pub fn concatenation<I>(factors: I) -> Regex
    where
        I: IntoIterator<Item = Regex>,
    {
        factors.into_iter().fold(Regex::EmptyString, Regex::concat)
    }

    /// Tests whether the expression matches the empty string.
    pub fn nullable(&self) -> bool {
        match self {
            Regex::Symbol(_) => false,
            Regex::EmptyString => true,
            Regex::EmptySet => false,
            Regex::Union(left, right) => left.nullable() || right.nullable(),
            Regex::Concat(left, right) => left.nullable() && right.nullable(),
            Regex::KleeneStar(_) => true,
        }
    }

    /// Every character that appears in a `Symbol` node.
    pub fn symbols(&self) -> BTreeSet<char> {
        let mut symbols = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(re) = stack.pop() {
            match re {
                Regex::Symbol(c) => {
                    symbols.insert(*c);
                }
                Regex::EmptyString | Regex::EmptySet => {}
                Regex::Union(left, right) | Regex::Concat(left, right) => {
                    stack.push(left);
                    stack.push(right);
                }
                Regex::KleeneStar(inner) => stack.push(inner),
            }
        }
        symbols
    }

    // a union node the constructors would have collapsed
    fn is_degenerate_union(&self) -> bool {
        match self {
            Regex::Union(left, right) => {
                **left == Regex::EmptySet || **right == Regex::EmptySet || left == right
            }
            _ => false,
        }
    }

    // operands of nested unions share the outermost pair of parentheses
    fn fmt_alternatives(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Union(left, right) if !self.is_degenerate_union() => {
                left.fmt_alternatives(f)?;
                write!(f, "|")?;
                right.fmt_alternatives(f)
            }
            _ => write!(f, "{}", self),
        }
    }
}

// precedence: star > concatenation > union
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Symbol(c) => write!(f, "{}", c),
            Regex::EmptyString => write!(f, "{}", EPSILON_GLYPH),
            Regex::EmptySet => write!(f, "{}", EMPTY_SET_GLYPH),
            Regex::Union(left, right) => {
                if **left == Regex::EmptySet {
                    return write!(f, "{}", right);
                }
                if **right == Regex::EmptySet || left == right {
                    return write!(f, "{}", left);
                }

                write!(f, "(")?;
                self.fmt_alternatives(f)?;
                write!(f, ")")
            }
            // a union operand brings its own parentheses
            Regex::Concat(left, right) => match (left.as_ref(), right.as_ref()) {
                (Regex::EmptyString, other) | (other, Regex::EmptyString) => write!(f, "{}", other),
                (Regex::EmptySet, _) | (_, Regex::EmptySet) => write!(f, "{}", EMPTY_SET_GLYPH),
                (left, right) => write!(f, "{}{}", left, right),
            },
            Regex::KleeneStar(inner) => match inner.as_ref() {
                Regex::EmptyString | Regex::EmptySet => write!(f, "{}", EPSILON_GLYPH),
                Regex::Union(left, right) if **left == Regex::EmptyString => {
                    write!(f, "{}", Regex::KleeneStar(right.clone()))
                }
                Regex::Union(left, right) if **right == Regex::EmptyString => {
                    write!(f, "{}", Regex::KleeneStar(left.clone()))
                }
                Regex::KleeneStar(_) => write!(f, "{}", inner),
                Regex::Concat(_, _) => write!(f, "({})*", inner),
                _ => write!(f, "{}*", inner),
            },
        }
    }
}
