use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::alphabet::DomainKind;
use crate::error::Error;

/// Legacy name that is strict over digits and non-strict over characters.
pub const DESCENDING_ORDER: &str = "descendingOrder";

/// What a rule inspects, used for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Compares numeric symbol values.
    Numeric,
    /// Classifies letters or compares symbols as strings.
    Alphabetic,
    /// Looks at the whole prefix rather than adjacent symbols.
    Structural,
}

/// Ordering direction of monotonic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

/// Closed catalog of built-in rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    StrictIncreasing,
    StrictDecreasing,
    NonDecreasing,
    NonIncreasing,
    NoAdjacentEven,
    NoAdjacentOdd,
    NoAdjacentVowels,
    NoAdjacentConsonants,
    NoDuplicates,
    StartsWithVowel,
    EndsWithConsonant,
    AlphabeticalOrder,
    NoConsecutiveNumbers,
}

impl RuleKind {
    pub const ALL: [RuleKind; 13] = [
        RuleKind::StrictIncreasing,
        RuleKind::StrictDecreasing,
        RuleKind::NonDecreasing,
        RuleKind::NonIncreasing,
        RuleKind::NoAdjacentEven,
        RuleKind::NoAdjacentOdd,
        RuleKind::NoAdjacentVowels,
        RuleKind::NoAdjacentConsonants,
        RuleKind::NoDuplicates,
        RuleKind::StartsWithVowel,
        RuleKind::EndsWithConsonant,
        RuleKind::AlphabeticalOrder,
        RuleKind::NoConsecutiveNumbers,
    ];

    /// Stable identifier used in plans and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            RuleKind::StrictIncreasing => "strict_increasing",
            RuleKind::StrictDecreasing => "strict_decreasing",
            RuleKind::NonDecreasing => "non_decreasing",
            RuleKind::NonIncreasing => "non_increasing",
            RuleKind::NoAdjacentEven => "no_adjacent_even",
            RuleKind::NoAdjacentOdd => "no_adjacent_odd",
            RuleKind::NoAdjacentVowels => "no_adjacent_vowels",
            RuleKind::NoAdjacentConsonants => "no_adjacent_consonants",
            RuleKind::NoDuplicates => "no_duplicates",
            RuleKind::StartsWithVowel => "starts_with_vowel",
            RuleKind::EndsWithConsonant => "ends_with_consonant",
            RuleKind::AlphabeticalOrder => "alphabetical_order",
            RuleKind::NoConsecutiveNumbers => "no_consecutive_numbers",
        }
    }

    /// Legacy camelCase names accepted in every domain.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            RuleKind::StrictIncreasing => &["strictIncreasing"],
            RuleKind::StrictDecreasing | RuleKind::NonIncreasing => &[],
            RuleKind::NonDecreasing => &["ascendingOrder"],
            RuleKind::NoAdjacentEven => &["noTwoEven", "noEvenTogether"],
            RuleKind::NoAdjacentOdd => &["noOddTogether"],
            RuleKind::NoAdjacentVowels => &["noVowelsTogether"],
            RuleKind::NoAdjacentConsonants => &["noConsonantsTogether"],
            RuleKind::NoDuplicates => &["noDuplicates"],
            RuleKind::StartsWithVowel => &["startsWithVowel"],
            RuleKind::EndsWithConsonant => &["endsWithConsonant"],
            RuleKind::AlphabeticalOrder => &["alphabeticalOrder"],
            RuleKind::NoConsecutiveNumbers => &["noConsecutiveNumbers"],
        }
    }

    /// Legacy name whose meaning depends on the domain.
    pub fn domain_alias(self, domain: DomainKind) -> Option<&'static str> {
        match (self, domain) {
            (RuleKind::StrictDecreasing, DomainKind::Numeric)
            | (RuleKind::NonIncreasing, DomainKind::Characters) => Some(DESCENDING_ORDER),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleKind::StrictIncreasing => "each value is greater than the previous one",
            RuleKind::StrictDecreasing => "each value is smaller than the previous one",
            RuleKind::NonDecreasing => "each value is greater than or equal to the previous one",
            RuleKind::NonIncreasing => "each value is smaller than or equal to the previous one",
            RuleKind::NoAdjacentEven => "no two even values next to each other",
            RuleKind::NoAdjacentOdd => "no two odd values next to each other",
            RuleKind::NoAdjacentVowels => "no two vowels next to each other",
            RuleKind::NoAdjacentConsonants => "no two consonants next to each other",
            RuleKind::NoDuplicates => "no symbol appears twice in the sequence",
            RuleKind::StartsWithVowel => "the first symbol is a vowel",
            RuleKind::EndsWithConsonant => "the last symbol is a consonant",
            RuleKind::AlphabeticalOrder => "symbols appear in alphabetical (string) order",
            RuleKind::NoConsecutiveNumbers => "adjacent values never differ by exactly one",
        }
    }

    pub fn category(self) -> RuleCategory {
        match self {
            RuleKind::StrictIncreasing
            | RuleKind::StrictDecreasing
            | RuleKind::NonDecreasing
            | RuleKind::NonIncreasing
            | RuleKind::NoAdjacentEven
            | RuleKind::NoAdjacentOdd
            | RuleKind::NoConsecutiveNumbers => RuleCategory::Numeric,
            RuleKind::NoAdjacentVowels
            | RuleKind::NoAdjacentConsonants
            | RuleKind::StartsWithVowel
            | RuleKind::EndsWithConsonant
            | RuleKind::AlphabeticalOrder => RuleCategory::Alphabetic,
            RuleKind::NoDuplicates => RuleCategory::Structural,
        }
    }

    /// Direction and strictness of monotonic numeric rules.
    pub fn direction(self) -> Option<(Direction, bool)> {
        match self {
            RuleKind::StrictIncreasing => Some((Direction::Increasing, true)),
            RuleKind::NonDecreasing => Some((Direction::Increasing, false)),
            RuleKind::StrictDecreasing => Some((Direction::Decreasing, true)),
            RuleKind::NonIncreasing => Some((Direction::Decreasing, false)),
            _ => None,
        }
    }

    /// Two monotonic rules conflict when they point in opposite directions
    /// and at least one of them is strict: no sequence of length two can
    /// satisfy both.
    pub fn conflicts_with(self, other: RuleKind) -> bool {
        match (self.direction(), other.direction()) {
            (Some((left, left_strict)), Some((right, right_strict))) => {
                left != right && (left_strict || right_strict)
            }
            _ => false,
        }
    }

    /// Resolve an id or a domain independent alias.
    pub fn from_name(name: &str) -> Option<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.id() == name || kind.aliases().contains(&name))
    }

    /// Resolve an id or any alias, as understood in `domain`.
    pub fn from_name_in(name: &str, domain: DomainKind) -> Option<RuleKind> {
        RuleKind::from_name(name).or_else(|| {
            RuleKind::ALL
                .into_iter()
                .find(|kind| kind.domain_alias(domain) == Some(name))
        })
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RuleKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RuleKind::from_name(value).ok_or_else(|| Error::UnknownRule(value.to_string()))
    }
}

/// First pair of mutually exclusive rules in `rules`, in selection order.
pub fn find_conflict(rules: &[RuleKind]) -> Option<(RuleKind, RuleKind)> {
    rules.iter().enumerate().find_map(|(index, left)| {
        rules[index + 1..]
            .iter()
            .find(|right| left.conflicts_with(**right))
            .map(|right| (*left, *right))
    })
}
