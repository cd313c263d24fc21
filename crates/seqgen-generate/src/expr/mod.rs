//! Expression language for custom predicates.
//!
//! An expression is compiled once (tokenized, parsed and type checked) and
//! then evaluated against every candidate it is scoped to. Variables:
//! `candidate`, `last`, `first` (text) and `position`, `length`,
//! `prefix_len` (int). Functions: `num`, `at`, `contains`, `defined`,
//! `is_vowel`, `is_consonant`, `is_even`, `is_odd`.
//!
//! Absent values (`last` on an empty prefix, `num` of a letter) make every
//! comparison that touches them false.
//!
//! Nesting, whether through parentheses, prefix operators, calls or long
//! operator chains, is capped at [`MAX_DEPTH`] levels.

mod eval;
mod lexer;
mod parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use seqgen_core::Scope;

use crate::errors::GenerationError;
use crate::predicate::{CandidateContext, Predicate};

pub use parser::{MAX_DEPTH, Type};

/// Compile error with the byte offset it was detected at.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid integer '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[error("unexpected end of expression at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("unknown variable '{name}' at offset {offset}")]
    UnknownVariable { name: String, offset: usize },
    #[error("unknown function '{name}' at offset {offset}")]
    UnknownFunction { name: String, offset: usize },
    #[error("'{name}' takes {expected} argument(s), found {found} at offset {offset}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
        offset: usize,
    },
    #[error("expected {expected}, found {found} at offset {offset}")]
    Type {
        expected: String,
        found: Type,
        offset: usize,
    },
    #[error("expression nested deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

impl ExprError {
    pub fn offset(&self) -> usize {
        match self {
            ExprError::UnexpectedChar { offset, .. }
            | ExprError::UnterminatedString { offset }
            | ExprError::InvalidNumber { offset, .. }
            | ExprError::UnexpectedToken { offset, .. }
            | ExprError::UnexpectedEnd { offset }
            | ExprError::UnknownVariable { offset, .. }
            | ExprError::UnknownFunction { offset, .. }
            | ExprError::Arity { offset, .. }
            | ExprError::Type { offset, .. }
            | ExprError::TooDeep { offset, .. } => *offset,
        }
    }
}

/// A compiled boolean expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    source: String,
    root: parser::Node,
}

impl Expr {
    pub fn compile(source: &str) -> Result<Self, ExprError> {
        let tokens = lexer::tokenize(source)?;
        let root = parser::parse(tokens, source.len())?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn evaluate(&self, ctx: &CandidateContext<'_>) -> bool {
        eval::eval(&self.root, ctx) == eval::Value::Bool(true)
    }
}

impl FromStr for Expr {
    type Err = ExprError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Expr::compile(source)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Named custom predicate backed by a compiled expression.
#[derive(Debug, Clone)]
pub struct ExprPredicate {
    name: String,
    scope: Scope,
    expr: Expr,
}

impl ExprPredicate {
    pub fn new(name: impl Into<String>, expr: Expr, scope: Scope) -> Self {
        Self {
            name: name.into(),
            scope,
            expr,
        }
    }

    /// Compile `source`, attributing any error to `name`.
    pub fn compile(
        name: impl Into<String>,
        source: &str,
        scope: Scope,
    ) -> Result<Self, GenerationError> {
        let name = name.into();
        match Expr::compile(source) {
            Ok(expr) => Ok(Self::new(name, expr, scope)),
            Err(error) => Err(GenerationError::InvalidExpression { name, error }),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl Predicate for ExprPredicate {
    fn id(&self) -> &str {
        &self.name
    }

    fn accepts(&self, ctx: &CandidateContext<'_>) -> bool {
        !self.scope.applies(ctx.position, ctx.length) || self.expr.evaluate(ctx)
    }
}
