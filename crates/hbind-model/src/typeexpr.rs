//! Hand-written type expression parser.
//!
//! Handles the type syntax of interface files: primitive keywords, `string`,
//! `bytes`, `optional<T>`, the `T?` shorthand, `sequence<T>`, `map<K, V>`,
//! and names of declared records, enums, and handles.

use crate::error::{ModelError, Result};
use crate::model::NamedKind;
use crate::types::{Primitive, TypeDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Open,
    Close,
    Comma,
    Question,
}

/// Parse a type expression.
///
/// `kind_of` resolves declared names. Names it does not know are kept as
/// record references so that generation reports them as unresolved with full
/// context, rather than failing here.
pub fn parse_type_expr(
    input: &str,
    kind_of: &dyn Fn(&str) -> Option<NamedKind>,
) -> Result<TypeDescriptor> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(invalid(input, "empty type"));
    }

    let mut parser = Parser {
        input,
        tokens: &tokens,
        pos: 0,
        kind_of,
    };
    let ty = parser.parse_expr()?;
    if let Some(tok) = parser.peek() {
        return Err(invalid(input, &format!("unexpected trailing {}", describe(tok))));
    }
    Ok(ty)
}

fn invalid(input: &str, detail: &str) -> ModelError {
    ModelError::InvalidTypeExpr {
        input: input.to_string(),
        detail: detail.to_string(),
    }
}

fn describe(tok: Token<'_>) -> String {
    match tok {
        Token::Ident(s) => format!("'{s}'"),
        Token::Open => "'<'".to_string(),
        Token::Close => "'>'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Question => "'?'".to_string(),
    }
}

/// Split a type expression into identifiers and punctuation.
fn tokenize(s: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = s.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' => {
                chars.next();
                tokens.push(Token::Open);
            }
            '>' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '?' => {
                chars.next();
                tokens.push(Token::Question);
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(&s[start..end]));
            }
            other => {
                return Err(invalid(s, &format!("unexpected character '{other}'")));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a, 'k> {
    input: &'a str,
    tokens: &'a [Token<'a>],
    pos: usize,
    kind_of: &'k dyn Fn(&str) -> Option<NamedKind>,
}

impl<'a> Parser<'a, '_> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Token<'static>) -> Result<()> {
        match self.next() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(invalid(
                self.input,
                &format!("expected {}, found {}", describe(want), describe(tok)),
            )),
            None => Err(invalid(
                self.input,
                &format!("expected {}, found end of input", describe(want)),
            )),
        }
    }

    /// expr := base '?'*
    fn parse_expr(&mut self) -> Result<TypeDescriptor> {
        let mut ty = self.parse_base()?;
        while self.peek() == Some(Token::Question) {
            self.pos += 1;
            ty = TypeDescriptor::optional(ty);
        }
        Ok(ty)
    }

    /// base := ident [ '<' expr (',' expr)* '>' ]
    fn parse_base(&mut self) -> Result<TypeDescriptor> {
        let name = match self.next() {
            Some(Token::Ident(name)) => name,
            Some(tok) => {
                return Err(invalid(
                    self.input,
                    &format!("expected type name, found {}", describe(tok)),
                ));
            }
            None => return Err(invalid(self.input, "expected type name")),
        };

        match name {
            "optional" => {
                let mut args = self.parse_args(name, 1)?;
                Ok(TypeDescriptor::optional(args.remove(0)))
            }
            "sequence" => {
                let mut args = self.parse_args(name, 1)?;
                Ok(TypeDescriptor::sequence(args.remove(0)))
            }
            "map" => {
                let mut args = self.parse_args(name, 2)?;
                let value = args.remove(1);
                let key = args.remove(0);
                Ok(TypeDescriptor::map(key, value))
            }
            "string" | "bytes" => Ok(TypeDescriptor::Buffer),
            other => {
                if let Some(p) = Primitive::from_keyword(other) {
                    return Ok(TypeDescriptor::primitive(p));
                }
                if other.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(invalid(
                        self.input,
                        &format!("type name '{other}' starts with a digit"),
                    ));
                }
                Ok(match (self.kind_of)(other) {
                    Some(NamedKind::Enum) => TypeDescriptor::enumeration(other),
                    Some(NamedKind::Handle) => TypeDescriptor::handle(other),
                    Some(NamedKind::Record) | None => TypeDescriptor::record(other),
                })
            }
        }
    }

    fn parse_args(&mut self, ctor: &str, arity: usize) -> Result<Vec<TypeDescriptor>> {
        self.expect(Token::Open)?;
        let mut args = vec![self.parse_expr()?];
        while self.peek() == Some(Token::Comma) {
            self.pos += 1;
            args.push(self.parse_expr()?);
        }
        self.expect(Token::Close)?;
        if args.len() != arity {
            return Err(invalid(
                self.input,
                &format!("'{ctor}' takes {arity} type argument(s), got {}", args.len()),
            ));
        }
        Ok(args)
    }
}
