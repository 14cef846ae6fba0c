use super::error::MatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    And,
    Or,
    Not,
    Cmp(CmpOp),
    Int(u64),
    Str(String),
    Ident(String),
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Dot => "`.`".into(),
            Token::And => "`and`".into(),
            Token::Or => "`or`".into(),
            Token::Not => "`not`".into(),
            Token::Cmp(op) => format!("`{}`", op.symbol()),
            Token::Int(value) => format!("integer {value}"),
            Token::Str(_) => "string literal".into(),
            Token::Ident(name) => format!("`{name}`"),
        }
    }
}

/// Token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, MatchError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let c = bytes[pos];
        let next = bytes.get(pos + 1).copied();
        let (token, len) = match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                pos += 1;
                continue;
            }
            b'(' => (Token::LParen, 1),
            b')' => (Token::RParen, 1),
            b'[' => (Token::LBracket, 1),
            b']' => (Token::RBracket, 1),
            b'.' => (Token::Dot, 1),
            b'&' if next == Some(b'&') => (Token::And, 2),
            b'|' if next == Some(b'|') => (Token::Or, 2),
            b'=' if next == Some(b'=') => (Token::Cmp(CmpOp::Eq), 2),
            b'!' if next == Some(b'=') => (Token::Cmp(CmpOp::Ne), 2),
            b'!' => (Token::Not, 1),
            b'<' if next == Some(b'=') => (Token::Cmp(CmpOp::Le), 2),
            b'<' => (Token::Cmp(CmpOp::Lt), 1),
            b'>' if next == Some(b'=') => (Token::Cmp(CmpOp::Ge), 2),
            b'>' => (Token::Cmp(CmpOp::Gt), 1),
            b'\'' | b'"' => {
                let (text, len) = string(source, start)?;
                (Token::Str(text), len)
            }
            b'0'..=b'9' => integer(source, start)?,
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let len = bytes[start..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                let word = &source[start..start + len];
                let token = match word {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    _ => Token::Ident(word.to_string()),
                };
                (token, len)
            }
            b'=' => return Err(MatchError::parse(start, "expected `==`")),
            _ => {
                let ch = source[start..].chars().next().unwrap_or('?');
                return Err(MatchError::parse(start, format!("unexpected character `{ch}`")));
            }
        };
        tokens.push(Spanned {
            token,
            offset: start,
        });
        pos = start + len;
    }
    Ok(tokens)
}

fn integer(source: &str, start: usize) -> Result<(Token, usize), MatchError> {
    let rest = &source[start..];
    let (digits, radix, prefix) = match rest.get(..2) {
        Some("0x") | Some("0X") => (&rest[2..], 16, 2),
        _ => (rest, 10, 0),
    };
    let len = digits
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    let text = &digits[..len];
    let value = u64::from_str_radix(text, radix)
        .map_err(|_| MatchError::parse(start, format!("invalid integer `{}`", &rest[..prefix + len])))?;
    Ok((Token::Int(value), prefix + len))
}

/// Quoted string starting at `start`; returns the unescaped text and the
/// number of source bytes consumed including both quotes.
fn string(source: &str, start: usize) -> Result<(String, usize), MatchError> {
    let mut chars = source[start..].char_indices();
    let Some((_, quote)) = chars.next() else {
        return Err(MatchError::parse(start, "expected string"));
    };
    let mut text = String::new();
    while let Some((i, ch)) = chars.next() {
        match ch {
            c if c == quote => return Ok((text, i + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c => text.push(c),
        }
    }
    Err(MatchError::parse(start, "unterminated string"))
}
