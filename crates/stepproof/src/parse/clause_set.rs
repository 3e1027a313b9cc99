use std::fmt;

use log::debug;

use super::{ParseErr, ParseResult};
use crate::clause::{Atom, Clause, ClauseSet};
use crate::Symbol;

/// Parses the clause-set notation `a,b;!a;!b`.
///
/// Atoms are separated by `,`, clauses by `;` or a line break. A single
/// trailing separator is accepted.
pub fn parse_prop_clause_set(formula: &str) -> ParseResult<ClauseSet<Symbol>> {
    let tokens = tokenize(formula)?;
    let cs = ClauseSetParser { tokens, pos: 0 }.parse_cs()?;
    debug!("parsed clause set {}", cs);
    Ok(cs)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum TokenKind {
    Comma,
    Semi,
    Not,
    Ident,
}

#[derive(Debug, PartialEq, Eq)]
struct Token<'f> {
    kind: TokenKind,
    spelling: &'f str,
    src_pos: usize,
}

impl<'f> fmt::Display for Token<'f> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Semi => write!(f, "';' at position {}", self.src_pos),
            _ => write!(f, "'{}' at position {}", self.spelling, self.src_pos),
        }
    }
}

fn tokenize(formula: &str) -> ParseResult<Vec<Token<'_>>> {
    let mut tokens = vec![];
    let mut chars = formula.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let kind = match c {
            ';' | '\n' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '!' => TokenKind::Not,
            c if c.is_whitespace() => continue,
            c if c.is_ascii_alphanumeric() => {
                let mut end = pos + 1;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Ident,
                    spelling: &formula[pos..end],
                    src_pos: pos,
                });
                continue;
            }
            c => return Err(ParseErr::InvalidChar(c, pos)),
        };
        tokens.push(Token {
            kind,
            spelling: &formula[pos..pos + c.len_utf8()],
            src_pos: pos,
        });
    }

    Ok(tokens)
}

struct ClauseSetParser<'f> {
    tokens: Vec<Token<'f>>,
    pos: usize,
}

impl<'f> ClauseSetParser<'f> {
    fn parse_cs(&mut self) -> ParseResult<ClauseSet<Symbol>> {
        if self.tokens.is_empty() {
            return Err(ParseErr::Empty);
        }

        let mut cs = ClauseSet::new(vec![self.parse_c()?]);

        while self.eat(TokenKind::Semi) && self.peek().is_some() {
            cs.add(self.parse_c()?);
        }

        match self.peek() {
            None => Ok(cs),
            Some(t) => Err(ParseErr::Expected("';' or ','".to_string(), t.to_string())),
        }
    }

    fn parse_c(&mut self) -> ParseResult<Clause<Symbol>> {
        let mut c = Clause::new(vec![self.parse_atom()?]);

        while self.eat(TokenKind::Comma) {
            c.add(self.parse_atom()?);
        }

        Ok(c)
    }

    fn parse_atom(&mut self) -> ParseResult<Atom<Symbol>> {
        let negated = self.eat(TokenKind::Not);
        match self.peek() {
            Some(Token {
                kind: TokenKind::Ident,
                spelling,
                ..
            }) => {
                let lit = Symbol::intern(spelling);
                self.pos += 1;
                Ok(Atom::new(lit, negated))
            }
            Some(t) => Err(ParseErr::Expected("identifier".to_string(), t.to_string())),
            None => Err(ParseErr::Expected(
                "identifier".to_string(),
                "end of input".to_string(),
            )),
        }
    }

    fn peek(&self) -> Option<&Token<'f>> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some(t) if t.kind == kind => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}
