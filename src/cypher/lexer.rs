//! Cypher scanner. Splits a statement into tokens with nesting depth.
//!
//! This is not a parser. It recognises just enough structure (clause
//! keywords, literals, comments, brackets) to find clause boundaries without
//! being fooled by keywords inside strings, comments or subqueries. Any
//! character it does not know becomes a `Punct` token.

use crate::{Error, Result};

/// A token from the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Bracket nesting depth at the token; 0 is the top level.
    pub depth: usize,
}

/// Byte span into the source statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Clause keywords
    Match, Optional, Where, Return, With, Unwind,
    Create, Merge, Delete, Detach, Set, Remove,
    Call, Yield, Union, Load, Foreach,
    Order, Skip, Limit,

    // Literals and names
    Identifier, StringLiteral, Number, Parameter,

    // Brackets
    Open, Close,

    // Anything else: operators, arrows, separators
    Punct,

    Eof,
}

impl TokenKind {
    /// Keywords that may begin a Cypher statement.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Match
                | TokenKind::Optional
                | TokenKind::With
                | TokenKind::Unwind
                | TokenKind::Call
                | TokenKind::Return
                | TokenKind::Create
                | TokenKind::Merge
        )
    }

    /// Clause keywords, as opposed to names, literals and punctuation.
    pub fn is_keyword(self) -> bool {
        !matches!(
            self,
            TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::Number
                | TokenKind::Parameter
                | TokenKind::Open
                | TokenKind::Close
                | TokenKind::Punct
                | TokenKind::Eof
        )
    }
}

/// Tokenize a Cypher statement.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut depth = 0usize;

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => { chars.next(); }

            '/' if matches!(chars.clone().nth(1), Some((_, '*'))) => {
                chars.next();
                chars.next();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    if c == '*' && matches!(chars.peek(), Some(&(_, '/'))) {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(Error::SyntaxError {
                        position: pos,
                        message: "Unterminated block comment".into(),
                    });
                }
            }

            '/' if matches!(chars.clone().nth(1), Some((_, '/'))) => {
                while chars.peek().is_some_and(|&(_, c)| c != '\n') {
                    chars.next();
                }
            }

            '\'' | '"' | '`' => {
                let quote = ch;
                chars.next();
                let end = loop {
                    match chars.next() {
                        // Backticks escape by doubling, strings by backslash.
                        Some((_, '\\')) if quote != '`' => { chars.next(); }
                        Some((i, c)) if c == quote => {
                            if quote == '`' && matches!(chars.peek(), Some(&(_, '`'))) {
                                chars.next();
                                continue;
                            }
                            break i + 1;
                        }
                        Some(_) => {}
                        None => {
                            return Err(Error::SyntaxError {
                                position: pos,
                                message: if quote == '`' {
                                    "Unterminated quoted identifier".into()
                                } else {
                                    "Unterminated string literal".into()
                                },
                            });
                        }
                    }
                };
                let kind = if quote == '`' { TokenKind::Identifier } else { TokenKind::StringLiteral };
                tokens.push(Token { kind, span: Span { start: pos, end }, depth });
            }

            c if c.is_ascii_digit() => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    // `1..3` is a range, not a float.
                    if c.is_ascii_alphanumeric()
                        || (c == '.' && !matches!(chars.clone().nth(1), Some((_, '.'))))
                    {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token { kind: TokenKind::Number, span: Span { start: pos, end }, depth });
            }

            '$' => {
                chars.next();
                let end = take_word(&mut chars, pos + 1);
                tokens.push(Token { kind: TokenKind::Parameter, span: Span { start: pos, end }, depth });
            }

            c if c.is_alphabetic() || c == '_' => {
                let end = take_word(&mut chars, pos);
                let kind = keyword_or_ident(&input[pos..end]);
                tokens.push(Token { kind, span: Span { start: pos, end }, depth });
            }

            '(' | '[' | '{' => {
                chars.next();
                tokens.push(Token { kind: TokenKind::Open, span: Span { start: pos, end: pos + 1 }, depth });
                depth += 1;
            }
            ')' | ']' | '}' => {
                chars.next();
                depth = depth.saturating_sub(1);
                tokens.push(Token { kind: TokenKind::Close, span: Span { start: pos, end: pos + 1 }, depth });
            }

            other => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Punct,
                    span: Span { start: pos, end: pos + other.len_utf8() },
                    depth,
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        depth,
    });

    Ok(tokens)
}

fn take_word(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, start: usize) -> usize {
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    end
}

/// Classify a bare word.
pub fn keyword_or_ident(s: &str) -> TokenKind {
    match s.to_ascii_uppercase().as_str() {
        "MATCH" => TokenKind::Match,
        "OPTIONAL" => TokenKind::Optional,
        "WHERE" => TokenKind::Where,
        "RETURN" => TokenKind::Return,
        "WITH" => TokenKind::With,
        "UNWIND" => TokenKind::Unwind,
        "CREATE" => TokenKind::Create,
        "MERGE" => TokenKind::Merge,
        "DELETE" => TokenKind::Delete,
        "DETACH" => TokenKind::Detach,
        "SET" => TokenKind::Set,
        "REMOVE" => TokenKind::Remove,
        "CALL" => TokenKind::Call,
        "YIELD" => TokenKind::Yield,
        "UNION" => TokenKind::Union,
        "LOAD" => TokenKind::Load,
        "FOREACH" => TokenKind::Foreach,
        "ORDER" => TokenKind::Order,
        "SKIP" => TokenKind::Skip,
        "LIMIT" => TokenKind::Limit,
        _ => TokenKind::Identifier,
    }
}
