use std::fmt;

use crate::packet::Segment;
use crate::protocols;

use super::error::MatchError;
use super::lexer::{CmpOp, Spanned, Token, tokenize};

/// Compiled boolean expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
    },
    /// Bare operand, true when it resolves to a non-zero or non-empty value.
    Truthy(Operand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Int(u64),
    Str(String),
    Path(Vec<Segment>),
    Crc32(Box<Operand>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(value) => write!(f, "{value}"),
            Operand::Str(text) => write!(f, "{text:?}"),
            Operand::Path(segments) => {
                for (i, segment) in segments.iter().enumerate() {
                    if i > 0 && matches!(segment, Segment::Field(_)) {
                        f.write_str(".")?;
                    }
                    write!(f, "{segment}")?;
                }
                Ok(())
            }
            Operand::Crc32(inner) => write!(f, "crc32({inner})"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(a, b) => write!(f, "({a} or {b})"),
            Expr::And(a, b) => write!(f, "({a} and {b})"),
            Expr::Not(inner) => write!(f, "not {inner}"),
            Expr::Compare { lhs, op, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Expr::Truthy(operand) => write!(f, "{operand}"),
        }
    }
}

pub fn parse(source: &str) -> Result<Expr, MatchError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };
    let expr = parser.or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(extra) => Err(MatchError::parse(
            extra.offset,
            format!("unexpected {}", extra.token.describe()),
        )),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |s| s.offset)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek_token() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), MatchError> {
        if self.eat(&expected) {
            return Ok(());
        }
        Err(self.unexpected(&format!("expected {}", expected.describe())))
    }

    fn unexpected(&self, context: &str) -> MatchError {
        match self.peek() {
            Some(found) => MatchError::parse(
                found.offset,
                format!("{context}, found {}", found.token.describe()),
            ),
            None => MatchError::parse(self.end, format!("{context}, found end of expression")),
        }
    }

    fn or(&mut self) -> Result<Expr, MatchError> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, MatchError> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::And) {
            let rhs = self.unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, MatchError> {
        if self.eat(&Token::Not) {
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, MatchError> {
        if self.eat(&Token::LParen) {
            let expr = self.or()?;
            self.expect(Token::RParen)?;
            return Ok(expr);
        }
        let lhs = self.operand()?;
        let Some(Token::Cmp(op)) = self.peek_token().cloned() else {
            return Ok(Expr::Truthy(lhs));
        };
        self.pos += 1;
        let rhs = self.operand()?;
        Ok(Expr::Compare { lhs, op, rhs })
    }

    fn operand(&mut self) -> Result<Operand, MatchError> {
        let offset = self.offset();
        match self.peek_token().cloned() {
            Some(Token::Int(value)) => {
                self.pos += 1;
                Ok(Operand::Int(value))
            }
            Some(Token::Str(text)) => {
                self.pos += 1;
                Ok(Operand::Str(text))
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                let next = self.peek_token().cloned();
                match next {
                    Some(Token::LParen) => self.call(name, offset),
                    Some(Token::Dot | Token::LBracket) => self.path(name),
                    _ if is_constant_name(&name) => protocols::constant(&name)
                        .map(Operand::Int)
                        .ok_or(MatchError::UnknownConstant { name, offset }),
                    _ => self.path(name),
                }
            }
            _ => Err(self.unexpected("expected a value")),
        }
    }

    fn call(&mut self, name: String, offset: usize) -> Result<Operand, MatchError> {
        if name != "crc32" {
            return Err(MatchError::UnknownFunction { name, offset });
        }
        self.expect(Token::LParen)?;
        let inner = self.operand()?;
        self.expect(Token::RParen)?;
        Ok(Operand::Crc32(Box::new(inner)))
    }

    fn path(&mut self, head: String) -> Result<Operand, MatchError> {
        let mut segments = vec![Segment::Field(head)];
        loop {
            if self.eat(&Token::Dot) {
                let Some(Token::Ident(name)) = self.peek_token().cloned() else {
                    return Err(self.unexpected("expected a field name after `.`"));
                };
                self.pos += 1;
                segments.push(Segment::Field(name));
            } else if self.eat(&Token::LBracket) {
                let Some(Token::Int(index)) = self.peek_token().cloned() else {
                    return Err(self.unexpected("expected an index"));
                };
                self.pos += 1;
                let index = usize::try_from(index)
                    .map_err(|_| MatchError::parse(self.offset(), "index out of range"))?;
                segments.push(Segment::Index(index));
                self.expect(Token::RBracket)?;
            } else {
                return Ok(Operand::Path(segments));
            }
        }
    }
}

/// Upper-case identifiers name protocol constants; layer and field names
/// are lower case.
fn is_constant_name(name: &str) -> bool {
    name.bytes().any(|b| b.is_ascii_uppercase())
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}
