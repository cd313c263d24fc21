use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Return every symbol that appears more than once, in first-repeat order.
pub fn duplicate_symbols<'a, I>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut duplicates = Vec::new();

    for symbol in symbols {
        if !seen.insert(symbol) && reported.insert(symbol) {
            duplicates.push(symbol.to_string());
        }
    }

    duplicates
}

/// Validate raw alphabet entries before they become an [`crate::Alphabet`].
///
/// This checks:
/// - no entry is empty
/// - no entry is repeated
pub fn validate_symbols(symbols: &[String]) -> Result<()> {
    if let Some(index) = symbols.iter().position(|symbol| symbol.is_empty()) {
        return Err(Error::InvalidSymbol(format!(
            "symbol at index {index} is empty"
        )));
    }

    let duplicates = duplicate_symbols(symbols.iter().map(String::as_str));
    if !duplicates.is_empty() {
        return Err(Error::InvalidAlphabet(format!(
            "duplicate symbols: {}",
            duplicates.join(", ")
        )));
    }

    Ok(())
}
