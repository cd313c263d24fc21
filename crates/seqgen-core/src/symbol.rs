use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const VOWELS: [&str; 5] = ["a", "e", "i", "o", "u"];

/// One element of an alphabet: a character or a digit string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(pub(crate) String);

impl Symbol {
    /// Create a symbol, rejecting the empty string.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidSymbol("symbol must not be empty".to_string()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the symbol, if it is a (signed) decimal integer.
    pub fn numeric_value(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }

    pub fn is_vowel(&self) -> bool {
        is_vowel(&self.0)
    }

    pub fn is_consonant(&self) -> bool {
        is_consonant(&self.0)
    }

    /// Non-numeric symbols are neither even nor odd.
    pub fn is_even(&self) -> bool {
        self.numeric_value()
            .is_some_and(|value| value.rem_euclid(2) == 0)
    }

    pub fn is_odd(&self) -> bool {
        self.numeric_value()
            .is_some_and(|value| value.rem_euclid(2) == 1)
    }
}

/// True when `value` case-insensitively equals one of `a e i o u`.
pub fn is_vowel(value: &str) -> bool {
    VOWELS.iter().any(|vowel| value.eq_ignore_ascii_case(vowel))
}

/// True for a single ASCII letter that is not a vowel.
pub fn is_consonant(value: &str) -> bool {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => ch.is_ascii_alphabetic() && !is_vowel(value),
        _ => false,
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// A finite ordered sequence of symbols.
///
/// `Display` concatenates the symbols, so `["1", "2", "3"]` renders as `123`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Sequence(Vec<Symbol>);

impl Sequence {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn first(&self) -> Option<&Symbol> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Symbol> {
        self.0.last()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.0.contains(symbol)
    }

    pub fn push(&mut self, symbol: Symbol) {
        self.0.push(symbol);
    }

    pub fn pop(&mut self) -> Option<Symbol> {
        self.0.pop()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.0.iter()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            f.write_str(symbol.as_str())?;
        }
        Ok(())
    }
}

impl From<Vec<Symbol>> for Sequence {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
