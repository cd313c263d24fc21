use std::fmt;

use seqgen_core::{Scope, Symbol};

/// Everything a predicate may inspect when deciding whether `candidate`
/// can extend `prefix`.
#[derive(Debug, Clone, Copy)]
pub struct CandidateContext<'a> {
    pub prefix: &'a [Symbol],
    pub candidate: &'a Symbol,
    /// 0-based index `candidate` would occupy; equal to `prefix.len()`.
    pub position: usize,
    /// Target length of the sequences being generated.
    pub length: usize,
}

impl<'a> CandidateContext<'a> {
    pub fn new(prefix: &'a [Symbol], candidate: &'a Symbol, length: usize) -> Self {
        Self {
            prefix,
            candidate,
            position: prefix.len(),
            length,
        }
    }

    pub fn last(&self) -> Option<&'a Symbol> {
        self.prefix.last()
    }

    /// First symbol of the sequence once `candidate` is appended.
    pub fn first(&self) -> &'a Symbol {
        self.prefix.first().unwrap_or(self.candidate)
    }

    /// Symbol at `index` of the sequence once `candidate` is appended.
    pub fn at(&self, index: usize) -> Option<&'a Symbol> {
        if index < self.prefix.len() {
            self.prefix.get(index)
        } else if index == self.prefix.len() {
            Some(self.candidate)
        } else {
            None
        }
    }

    pub fn is_final(&self) -> bool {
        self.position + 1 == self.length
    }
}

/// A pure gate deciding whether a candidate may extend a prefix.
///
/// Implementations must be side-effect free and must treat an empty prefix
/// as vacuously satisfied unless they explicitly constrain a position.
pub trait Predicate: Send + Sync + fmt::Debug {
    /// Name used in reports and rejection statistics.
    fn id(&self) -> &str;

    fn accepts(&self, ctx: &CandidateContext<'_>) -> bool;
}

/// Programmatic custom predicate built from a closure.
pub struct FnPredicate<F> {
    name: String,
    scope: Scope,
    check: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&CandidateContext<'_>) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            scope: Scope::Every,
            check,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<F> Predicate for FnPredicate<F>
where
    F: Fn(&CandidateContext<'_>) -> bool + Send + Sync,
{
    fn id(&self) -> &str {
        &self.name
    }

    fn accepts(&self, ctx: &CandidateContext<'_>) -> bool {
        if !self.scope.applies(ctx.position, ctx.length) {
            return true;
        }
        (self.check)(ctx)
    }
}
