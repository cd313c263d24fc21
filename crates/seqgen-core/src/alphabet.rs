use serde::{Deserialize, Serialize};

use crate::LEADING_ZERO;
use crate::error::{Error, Result};
use crate::symbol::Symbol;
use crate::validation::duplicate_symbols;

/// Ordered list of distinct symbols tried at every position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    /// Build an alphabet, rejecting duplicate symbols.
    ///
    /// An empty alphabet is valid: it produces no sequences of positive length.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        let duplicates = duplicate_symbols(symbols.iter().map(Symbol::as_str));
        if !duplicates.is_empty() {
            return Err(Error::InvalidAlphabet(format!(
                "duplicate symbols: {}",
                duplicates.join(", ")
            )));
        }
        Ok(Self { symbols })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The decimal digits `0` through `9`.
    pub fn digits() -> Self {
        let symbols = (0..=9)
            .map(|digit| Symbol(digit.to_string()))
            .collect::<Vec<_>>();
        Self { symbols }
    }

    /// Parse a comma separated list such as `"a, b ,c"`.
    ///
    /// Entries are trimmed and blank entries dropped before validation. A
    /// list with no symbols left is an error; use [`Alphabet::empty`] for an
    /// intentionally empty alphabet.
    pub fn parse_list(input: &str) -> Result<Self> {
        let symbols = input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Symbol::new)
            .collect::<Result<Vec<_>>>()?;
        if symbols.is_empty() {
            return Err(Error::InvalidAlphabet(format!("'{input}' lists no symbols")));
        }
        Self::new(symbols)
    }

    /// Build from raw strings, validating each symbol.
    pub fn from_strings<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols = values
            .into_iter()
            .map(Symbol::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }
}

impl TryFrom<Vec<Symbol>> for Alphabet {
    type Error = Error;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self> {
        Alphabet::new(symbols)
    }
}

impl From<Alphabet> for Vec<Symbol> {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols
    }
}

/// Which kind of domain a request runs over, without its alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Characters,
    Numeric,
}

impl DomainKind {
    pub fn label(self) -> &'static str {
        match self {
            DomainKind::Characters => "characters",
            DomainKind::Numeric => "numeric",
        }
    }
}

/// The symbol space a generation runs over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Domain {
    /// Caller supplied alphabet, every symbol allowed at every position.
    Characters { alphabet: Alphabet },
    /// Digits `0`-`9`; `0` is never placed first.
    Numeric,
}

impl Domain {
    pub fn alphabet(&self) -> Alphabet {
        match self {
            Domain::Characters { alphabet } => alphabet.clone(),
            Domain::Numeric => Alphabet::digits(),
        }
    }

    /// Symbols left out of the branch set at the root.
    ///
    /// This is a structural exclusion and never counts as a rejection.
    pub fn excluded_at_root(&self, symbol: &Symbol) -> bool {
        matches!(self, Domain::Numeric) && symbol.as_str() == LEADING_ZERO
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            Domain::Characters { .. } => DomainKind::Characters,
            Domain::Numeric => DomainKind::Numeric,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }
}
