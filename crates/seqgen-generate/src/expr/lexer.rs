use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::ExprError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Int(i64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            TokenKind::Int(value) => return write!(f, "{value}"),
            TokenKind::Str(value) => return write!(f, "{value:?}"),
            TokenKind::Ident(name) => name.as_str(),
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character in the source.
    pub offset: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.peek().copied() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '\'' || ch == '"' {
            chars.next();
            let value = read_string(&mut chars, ch, offset)?;
            tokens.push(Token {
                kind: TokenKind::Str(value),
                offset,
            });
            continue;
        }

        if ch.is_ascii_digit() {
            let mut text = String::new();
            while let Some((_, c)) = chars.peek().copied() {
                if !c.is_ascii_digit() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            let value = text
                .parse::<i64>()
                .map_err(|_| ExprError::InvalidNumber { text, offset })?;
            tokens.push(Token {
                kind: TokenKind::Int(value),
                offset,
            });
            continue;
        }

        if is_ident_start(ch) {
            let mut name = String::new();
            while let Some((_, c)) = chars.peek().copied() {
                if !is_ident_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            tokens.push(Token {
                kind: TokenKind::Ident(name),
                offset,
            });
            continue;
        }

        chars.next();
        let next = chars.peek().map(|(_, c)| *c);
        let (kind, wide) = match (ch, next) {
            ('&', Some('&')) => (TokenKind::AndAnd, true),
            ('|', Some('|')) => (TokenKind::OrOr, true),
            ('=', Some('=')) => (TokenKind::EqEq, true),
            ('!', Some('=')) => (TokenKind::NotEq, true),
            ('<', Some('=')) => (TokenKind::Le, true),
            ('>', Some('=')) => (TokenKind::Ge, true),
            ('!', _) => (TokenKind::Bang, false),
            ('<', _) => (TokenKind::Lt, false),
            ('>', _) => (TokenKind::Gt, false),
            ('(', _) => (TokenKind::LParen, false),
            (')', _) => (TokenKind::RParen, false),
            (',', _) => (TokenKind::Comma, false),
            ('+', _) => (TokenKind::Plus, false),
            ('-', _) => (TokenKind::Minus, false),
            ('*', _) => (TokenKind::Star, false),
            ('/', _) => (TokenKind::Slash, false),
            ('%', _) => (TokenKind::Percent, false),
            _ => return Err(ExprError::UnexpectedChar { ch, offset }),
        };
        if wide {
            chars.next();
        }
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

fn read_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    offset: usize,
) -> Result<String, ExprError> {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        if c == quote {
            return Ok(value);
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            }
            continue;
        }
        value.push(c);
    }
    Err(ExprError::UnterminatedString { offset })
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
