// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::iter::Peekable;
use std::str::Chars;

use crate::output::UcumError;

/// A token of a UCUM expression. Bracketed runs such as `[in_i]` are
/// glued onto the surrounding atom text, so `m[Hg]` and `B[10.nV]`
/// arrive as single `Atom` tokens. Digit runs right after an atom or a
/// closing parenthesis become `Exponent` tokens; elsewhere they are
/// numeric factors.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Dot,
    Slash,
    LPar,
    RPar,
    /// A numeric factor, kept as source text.
    Number(String),
    /// An atom code, possibly containing bracketed segments.
    Atom(String),
    /// An integer exponent attached to the preceding component.
    Exponent(i32),
    /// The text between `{` and `}`.
    Annotation(String),
    Error(UcumError),
    Eof,
}

pub fn describe(token: &Token) -> String {
    match token {
        Token::Dot => "`.`".to_owned(),
        Token::Slash => "`/`".to_owned(),
        Token::LPar => "`(`".to_owned(),
        Token::RPar => "`)`".to_owned(),
        Token::Number(_) => "number".to_owned(),
        Token::Atom(_) => "unit".to_owned(),
        Token::Exponent(_) => "exponent".to_owned(),
        Token::Annotation(_) => "annotation".to_owned(),
        Token::Error(err) => format!("<{}>", err),
        Token::Eof => "end of expression".to_owned(),
    }
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

#[derive(Clone)]
pub struct TokenIterator<'a> {
    chars: Peekable<Chars<'a>>,
    offset: usize,
    /// True right after an atom or `)`, where a signed digit run is an
    /// exponent rather than a factor.
    allow_exponent: bool,
}

impl<'a> TokenIterator<'a> {
    pub fn new(input: &'a str) -> TokenIterator<'a> {
        TokenIterator {
            chars: input.chars().peekable(),
            offset: 0,
            allow_exponent: false,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    fn error(&self, err: UcumError, offset: usize) -> Spanned {
        Spanned {
            token: Token::Error(err),
            offset,
        }
    }

    fn take_digits(&mut self, into: &mut String) {
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                into.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Consumes a `[...]` run including both brackets.
    fn take_bracketed(&mut self, into: &mut String, start: usize) -> Result<(), Spanned> {
        into.push('[');
        self.bump();
        loop {
            match self.chars.peek() {
                None => {
                    return Err(self.error(
                        UcumError::InvalidSyntax {
                            message: "unbalanced '['".to_owned(),
                            offset: Some(start),
                        },
                        start,
                    ))
                }
                Some(&c) if c.is_whitespace() => {
                    let offset = self.offset;
                    return Err(self.error(UcumError::DisallowedWhitespace { offset }, offset));
                }
                Some(&'[') => {
                    let offset = self.offset;
                    return Err(self.error(
                        UcumError::InvalidSyntax {
                            message: "nested '['".to_owned(),
                            offset: Some(offset),
                        },
                        offset,
                    ));
                }
                Some(&']') => {
                    into.push(']');
                    self.bump();
                    return Ok(());
                }
                Some(&c) => {
                    into.push(c);
                    self.bump();
                }
            }
        }
    }

    fn is_atom_char(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_' || c == '\'' || c == '%'
    }
}

impl<'a> Iterator for TokenIterator<'a> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Spanned> {
        let start = self.offset;
        let allow_exponent = self.allow_exponent;
        self.allow_exponent = false;

        let c = match self.chars.peek() {
            None => {
                return Some(Spanned {
                    token: Token::Eof,
                    offset: start,
                })
            }
            Some(&c) => c,
        };

        if c.is_whitespace() {
            return Some(self.error(UcumError::DisallowedWhitespace { offset: start }, start));
        }

        let token = match c {
            '.' => {
                self.bump();
                Token::Dot
            }
            '/' => {
                self.bump();
                Token::Slash
            }
            '(' => {
                self.bump();
                Token::LPar
            }
            ')' => {
                self.bump();
                self.allow_exponent = true;
                Token::RPar
            }
            '{' => {
                self.bump();
                let mut text = String::new();
                loop {
                    match self.chars.peek() {
                        None => {
                            return Some(self.error(
                                UcumError::InvalidSyntax {
                                    message: "unterminated annotation".to_owned(),
                                    offset: Some(start),
                                },
                                start,
                            ))
                        }
                        Some(&'{') => {
                            let offset = self.offset;
                            return Some(self.error(
                                UcumError::InvalidSyntax {
                                    message: "nested annotation".to_owned(),
                                    offset: Some(offset),
                                },
                                offset,
                            ));
                        }
                        Some(&'}') => {
                            self.bump();
                            break;
                        }
                        Some(&c) if c.is_whitespace() => {
                            let offset = self.offset;
                            return Some(
                                self.error(UcumError::DisallowedWhitespace { offset }, offset),
                            );
                        }
                        Some(&c) => {
                            text.push(c);
                            self.bump();
                        }
                    }
                }
                Token::Annotation(text)
            }
            '}' => {
                self.bump();
                return Some(self.error(
                    UcumError::InvalidSyntax {
                        message: "unmatched '}'".to_owned(),
                        offset: Some(start),
                    },
                    start,
                ));
            }
            '+' | '-' => {
                if !allow_exponent {
                    self.bump();
                    return Some(self.error(
                        UcumError::InvalidSyntax {
                            message: format!("misplaced sign '{}'", c),
                            offset: Some(start),
                        },
                        start,
                    ));
                }
                self.bump();
                let mut digits = String::new();
                self.take_digits(&mut digits);
                if digits.is_empty() {
                    return Some(self.error(
                        UcumError::InvalidSyntax {
                            message: "expected digits after exponent sign".to_owned(),
                            offset: Some(start),
                        },
                        start,
                    ));
                }
                match digits.parse::<i32>() {
                    Ok(value) => {
                        self.allow_exponent = false;
                        Token::Exponent(if c == '-' { -value } else { value })
                    }
                    Err(_) => {
                        return Some(self.error(
                            UcumError::InvalidSyntax {
                                message: "exponent is too large".to_owned(),
                                offset: Some(start),
                            },
                            start,
                        ))
                    }
                }
            }
            '0'..='9' => {
                let mut digits = String::new();
                self.take_digits(&mut digits);
                // `10*` and `10^` are atoms ("the number ten to an
                // arbitrary power"), not factors.
                if let Some(&next) = self.chars.peek() {
                    if next == '*' || next == '^' {
                        digits.push(next);
                        self.bump();
                        self.allow_exponent = true;
                        return Some(Spanned {
                            token: Token::Atom(digits),
                            offset: start,
                        });
                    }
                }
                if allow_exponent {
                    match digits.parse::<i32>() {
                        Ok(value) => Token::Exponent(value),
                        Err(_) => {
                            return Some(self.error(
                                UcumError::InvalidSyntax {
                                    message: "exponent is too large".to_owned(),
                                    offset: Some(start),
                                },
                                start,
                            ))
                        }
                    }
                } else {
                    Token::Number(digits)
                }
            }
            c if TokenIterator::is_atom_char(c) || c == '[' => {
                let mut text = String::new();
                loop {
                    match self.chars.peek() {
                        Some(&c) if TokenIterator::is_atom_char(c) => {
                            text.push(c);
                            self.bump();
                        }
                        Some(&'[') => {
                            if let Err(err) = self.take_bracketed(&mut text, self.offset) {
                                return Some(err);
                            }
                        }
                        _ => break,
                    }
                }
                self.allow_exponent = true;
                Token::Atom(text)
            }
            ']' => {
                self.bump();
                return Some(self.error(
                    UcumError::InvalidSyntax {
                        message: "unmatched ']'".to_owned(),
                        offset: Some(start),
                    },
                    start,
                ));
            }
            other => {
                self.bump();
                return Some(self.error(
                    UcumError::InvalidSyntax {
                        message: format!("unexpected character '{}'", other),
                        offset: Some(start),
                    },
                    start,
                ));
            }
        };

        Some(Spanned {
            token,
            offset: start,
        })
    }
}
