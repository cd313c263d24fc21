use std::cmp::Ordering;

use seqgen_core::symbol::{is_consonant, is_vowel};

use super::parser::{BinOp, Func, Node, Var};
use crate::predicate::CandidateContext;

/// Runtime value. `Missing` stands for an absent `last`, a non-numeric
/// `num(...)`, an out-of-range `at(...)` or an arithmetic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Value<'a> {
    Int(i64),
    Text(&'a str),
    Bool(bool),
    Missing,
}

impl Value<'_> {
    fn truthy(self) -> bool {
        matches!(self, Value::Bool(true))
    }
}

fn int(value: usize) -> Value<'static> {
    i64::try_from(value).map_or(Value::Missing, Value::Int)
}

pub(crate) fn eval<'a>(node: &'a Node, ctx: &CandidateContext<'a>) -> Value<'a> {
    match node {
        Node::Int(value) => Value::Int(*value),
        Node::Text(value) => Value::Text(value),
        Node::Bool(value) => Value::Bool(*value),
        Node::Var(var) => match var {
            Var::Candidate => Value::Text(ctx.candidate.as_str()),
            Var::Last => ctx
                .last()
                .map_or(Value::Missing, |symbol| Value::Text(symbol.as_str())),
            Var::First => Value::Text(ctx.first().as_str()),
            Var::Position => int(ctx.position),
            Var::Length => int(ctx.length),
            Var::PrefixLen => int(ctx.prefix.len()),
        },
        Node::Not(inner) => Value::Bool(!eval(inner, ctx).truthy()),
        Node::Neg(inner) => match eval(inner, ctx) {
            Value::Int(value) => value.checked_neg().map_or(Value::Missing, Value::Int),
            _ => Value::Missing,
        },
        Node::Call(func, arg) => call(*func, eval(arg, ctx), ctx),
        Node::Binary(BinOp::And, left, right) => {
            Value::Bool(eval(left, ctx).truthy() && eval(right, ctx).truthy())
        }
        Node::Binary(BinOp::Or, left, right) => {
            Value::Bool(eval(left, ctx).truthy() || eval(right, ctx).truthy())
        }
        Node::Binary(op, left, right) => binary(*op, eval(left, ctx), eval(right, ctx)),
    }
}

fn call<'a>(func: Func, arg: Value<'a>, ctx: &CandidateContext<'a>) -> Value<'a> {
    match (func, arg) {
        (Func::Defined, value) => Value::Bool(value != Value::Missing),
        (Func::Num, Value::Text(text)) => text.parse::<i64>().map_or(Value::Missing, Value::Int),
        (Func::At, Value::Int(index)) => usize::try_from(index)
            .ok()
            .and_then(|index| ctx.at(index))
            .map_or(Value::Missing, |symbol| Value::Text(symbol.as_str())),
        (Func::Contains, Value::Text(text)) => {
            Value::Bool(ctx.prefix.iter().any(|symbol| symbol.as_str() == text))
        }
        (Func::IsVowel, Value::Text(text)) => Value::Bool(is_vowel(text)),
        (Func::IsConsonant, Value::Text(text)) => Value::Bool(is_consonant(text)),
        (Func::IsEven, Value::Int(value)) => Value::Bool(value.rem_euclid(2) == 0),
        (Func::IsOdd, Value::Int(value)) => Value::Bool(value.rem_euclid(2) == 1),
        (Func::Num | Func::At, _) => Value::Missing,
        _ => Value::Bool(false),
    }
}

fn binary<'a>(op: BinOp, left: Value<'a>, right: Value<'a>) -> Value<'a> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            if let Some(result) = arithmetic(op, a, b) {
                return result;
            }
            a.cmp(&b)
        }
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        _ if is_comparison(op) => return Value::Bool(false),
        _ => return Value::Missing,
    };

    Value::Bool(match op {
        BinOp::Eq => ordering == Ordering::Equal,
        BinOp::Ne => ordering != Ordering::Equal,
        BinOp::Lt => ordering == Ordering::Less,
        BinOp::Le => ordering != Ordering::Greater,
        BinOp::Gt => ordering == Ordering::Greater,
        BinOp::Ge => ordering != Ordering::Less,
        _ => return Value::Missing,
    })
}

/// Integer arithmetic; `None` when `op` is a comparison.
fn arithmetic(op: BinOp, a: i64, b: i64) -> Option<Value<'static>> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Rem => a.checked_rem_euclid(b),
        _ => return None,
    };
    Some(result.map_or(Value::Missing, Value::Int))
}

fn is_comparison(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
    )
}
