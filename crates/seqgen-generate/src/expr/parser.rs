use std::fmt;

use super::ExprError;
use super::lexer::{Token, TokenKind};

/// Static type of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Text,
    Bool,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Int => "int",
            Type::Text => "text",
            Type::Bool => "bool",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Var {
    Candidate,
    Last,
    First,
    Position,
    Length,
    PrefixLen,
}

impl Var {
    fn from_name(name: &str) -> Option<(Var, Type)> {
        Some(match name {
            "candidate" => (Var::Candidate, Type::Text),
            "last" => (Var::Last, Type::Text),
            "first" => (Var::First, Type::Text),
            "position" => (Var::Position, Type::Int),
            "length" => (Var::Length, Type::Int),
            "prefix_len" => (Var::PrefixLen, Type::Int),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Num,
    At,
    Contains,
    Defined,
    IsVowel,
    IsConsonant,
    IsEven,
    IsOdd,
}

impl Func {
    /// Function, its parameter type (`None` accepts any) and its result type.
    fn from_name(name: &str) -> Option<(Func, Option<Type>, Type)> {
        Some(match name {
            "num" => (Func::Num, Some(Type::Text), Type::Int),
            "at" => (Func::At, Some(Type::Int), Type::Text),
            "contains" => (Func::Contains, Some(Type::Text), Type::Bool),
            "defined" => (Func::Defined, None, Type::Bool),
            "is_vowel" => (Func::IsVowel, Some(Type::Text), Type::Bool),
            "is_consonant" => (Func::IsConsonant, Some(Type::Text), Type::Bool),
            "is_even" => (Func::IsEven, Some(Type::Int), Type::Bool),
            "is_odd" => (Func::IsOdd, Some(Type::Int), Type::Bool),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Int(i64),
    Text(String),
    Bool(bool),
    Var(Var),
    Call(Func, Box<Node>),
    Not(Box<Node>),
    Neg(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
}

/// Deepest nesting accepted, both while parsing and in the finished tree.
pub const MAX_DEPTH: usize = 256;

/// A node together with its static type, source offset and tree height.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Typed {
    pub node: Node,
    pub ty: Type,
    pub offset: usize,
    pub depth: usize,
}

impl Typed {
    fn leaf(node: Node, ty: Type, offset: usize) -> Self {
        Self {
            node,
            ty,
            offset,
            depth: 1,
        }
    }
}

/// Parse a token stream into a boolean expression tree.
pub(crate) fn parse(tokens: Vec<Token>, source_len: usize) -> Result<Node, ExprError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_len,
        nesting: 0,
    };
    let root = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(ExprError::UnexpectedToken {
            found: token.kind.to_string(),
            offset: token.offset,
        });
    }
    expect_type(&root, Type::Bool)?;
    Ok(root.node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    source_len: usize,
    /// Open prefix operators, parentheses and calls.
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn advance(&mut self) -> Result<Token, ExprError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ExprError::UnexpectedEnd {
                offset: self.source_len,
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn enter(&mut self, offset: usize) -> Result<(), ExprError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(ExprError::TooDeep {
                limit: MAX_DEPTH,
                offset,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        let token = self.advance()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                found: token.kind.to_string(),
                offset: token.offset,
            })
        }
    }

    fn parse_or(&mut self) -> Result<Typed, ExprError> {
        let mut left = self.parse_and()?;
        while self.peek_kind() == Some(&TokenKind::OrOr) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = logical(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Typed, ExprError> {
        let mut left = self.parse_not()?;
        while self.peek_kind() == Some(&TokenKind::AndAnd) {
            self.pos += 1;
            let right = self.parse_not()?;
            left = logical(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Typed, ExprError> {
        if let Some(token) = self.peek()
            && token.kind == TokenKind::Bang
        {
            let offset = token.offset;
            self.pos += 1;
            self.enter(offset)?;
            let inner = self.parse_not()?;
            self.leave();
            expect_type(&inner, Type::Bool)?;
            return Ok(Typed {
                depth: inner.depth + 1,
                node: Node::Not(Box::new(inner.node)),
                ty: Type::Bool,
                offset,
            });
        }
        self.parse_cmp()
    }

    fn parse_cmp(&mut self) -> Result<Typed, ExprError> {
        let left = self.parse_sum()?;
        let op = match self.peek_kind() {
            Some(TokenKind::EqEq) => BinOp::Eq,
            Some(TokenKind::NotEq) => BinOp::Ne,
            Some(TokenKind::Lt) => BinOp::Lt,
            Some(TokenKind::Le) => BinOp::Le,
            Some(TokenKind::Gt) => BinOp::Gt,
            Some(TokenKind::Ge) => BinOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_sum()?;

        if left.ty == Type::Bool {
            return Err(type_error(&left, "int or text"));
        }
        if right.ty != left.ty {
            return Err(type_error(&right, &left.ty.to_string()));
        }

        binary(op, left, right, Type::Bool)
    }

    fn parse_sum(&mut self) -> Result<Typed, ExprError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_term()?;
            left = arithmetic(op, left, right)?;
        }
    }

    fn parse_term(&mut self) -> Result<Typed, ExprError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                Some(TokenKind::Percent) => BinOp::Rem,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = arithmetic(op, left, right)?;
        }
    }

    fn parse_unary(&mut self) -> Result<Typed, ExprError> {
        if let Some(token) = self.peek()
            && token.kind == TokenKind::Minus
        {
            let offset = token.offset;
            self.pos += 1;
            self.enter(offset)?;
            let inner = self.parse_unary()?;
            self.leave();
            expect_type(&inner, Type::Int)?;
            return Ok(Typed {
                depth: inner.depth + 1,
                node: Node::Neg(Box::new(inner.node)),
                ty: Type::Int,
                offset,
            });
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Typed, ExprError> {
        let token = self.advance()?;
        let offset = token.offset;
        let (node, ty) = match token.kind {
            TokenKind::Int(value) => (Node::Int(value), Type::Int),
            TokenKind::Str(value) => (Node::Text(value), Type::Text),
            TokenKind::LParen => {
                self.enter(offset)?;
                let inner = self.parse_or()?;
                self.leave();
                self.expect(TokenKind::RParen)?;
                return Ok(Typed { offset, ..inner });
            }
            TokenKind::Ident(name) if name == "true" => (Node::Bool(true), Type::Bool),
            TokenKind::Ident(name) if name == "false" => (Node::Bool(false), Type::Bool),
            TokenKind::Ident(name) => {
                if self.peek_kind() == Some(&TokenKind::LParen) {
                    return self.parse_call(name, offset);
                }
                let (var, ty) =
                    Var::from_name(&name).ok_or(ExprError::UnknownVariable { name, offset })?;
                (Node::Var(var), ty)
            }
            other => {
                return Err(ExprError::UnexpectedToken {
                    found: other.to_string(),
                    offset,
                });
            }
        };
        Ok(Typed::leaf(node, ty, offset))
    }

    fn parse_call(&mut self, name: String, offset: usize) -> Result<Typed, ExprError> {
        let Some((func, param, ty)) = Func::from_name(&name) else {
            return Err(ExprError::UnknownFunction { name, offset });
        };
        self.expect(TokenKind::LParen)?;
        self.enter(offset)?;

        let mut args = Vec::new();
        if self.peek_kind() != Some(&TokenKind::RParen) {
            loop {
                args.push(self.parse_or()?);
                if self.peek_kind() != Some(&TokenKind::Comma) {
                    break;
                }
                self.pos += 1;
            }
        }
        self.leave();
        self.expect(TokenKind::RParen)?;

        if args.len() != 1 {
            return Err(ExprError::Arity {
                name,
                expected: 1,
                found: args.len(),
                offset,
            });
        }
        let arg = args.remove(0);
        if let Some(param) = param {
            expect_type(&arg, param)?;
        }

        Ok(Typed {
            depth: arg.depth + 1,
            node: Node::Call(func, Box::new(arg.node)),
            ty,
            offset,
        })
    }
}

fn logical(op: BinOp, left: Typed, right: Typed) -> Result<Typed, ExprError> {
    expect_type(&left, Type::Bool)?;
    expect_type(&right, Type::Bool)?;
    binary(op, left, right, Type::Bool)
}

fn arithmetic(op: BinOp, left: Typed, right: Typed) -> Result<Typed, ExprError> {
    expect_type(&left, Type::Int)?;
    expect_type(&right, Type::Int)?;
    binary(op, left, right, Type::Int)
}

/// Operator chains grow the tree without recursing in the parser, so the
/// height is checked here as well.
fn binary(op: BinOp, left: Typed, right: Typed, ty: Type) -> Result<Typed, ExprError> {
    let depth = left.depth.max(right.depth) + 1;
    if depth > MAX_DEPTH {
        return Err(ExprError::TooDeep {
            limit: MAX_DEPTH,
            offset: right.offset,
        });
    }
    Ok(Typed {
        offset: left.offset,
        node: Node::Binary(op, Box::new(left.node), Box::new(right.node)),
        ty,
        depth,
    })
}

fn expect_type(typed: &Typed, expected: Type) -> Result<(), ExprError> {
    if typed.ty == expected {
        Ok(())
    } else {
        Err(type_error(typed, &expected.to_string()))
    }
}

fn type_error(typed: &Typed, expected: &str) -> ExprError {
    ExprError::Type {
        expected: expected.to_string(),
        found: typed.ty,
        offset: typed.offset,
    }
}
